//! Kid-friendly docs for the p5.js functions sketches use most.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Slider bounds for trying an argument out, in preview units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub step: f32,
}

impl ArgRange {
    const fn new(min: f32, max: f32, default: f32, step: f32) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ArgDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub range: Option<ArgRange>,
}

const fn arg(name: &'static str, description: &'static str) -> ArgDoc {
    ArgDoc {
        name,
        description,
        range: None,
    }
}

const fn slider(name: &'static str, description: &'static str, range: ArgRange) -> ArgDoc {
    ArgDoc {
        name,
        description,
        range: Some(range),
    }
}

/// How the playground draws a function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    None,
    Shape,
    Color,
}

#[derive(Debug, PartialEq)]
pub struct FunctionDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub args: &'static [ArgDoc],
    pub example: Option<&'static str>,
}

impl FunctionDoc {
    /// `name(a, b, c)`
    pub fn signature(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(|a| a.name).collect();
        format!("{}({})", self.name, args.join(", "))
    }

    pub fn preview(&self) -> Preview {
        match self.name {
            "arc" | "circle" | "ellipse" | "rect" | "square" | "line" | "strokeWeight" => {
                Preview::Shape
            }
            "fill" | "stroke" | "background" => Preview::Color,
            _ => Preview::None,
        }
    }

    /// Whether every argument has a slider
    pub fn is_playable(&self) -> bool {
        !self.args.is_empty() && self.args.iter().all(|arg| arg.range.is_some())
    }

    /// Starting slider values, one per argument
    pub fn default_values(&self) -> Vec<f32> {
        self.args
            .iter()
            .map(|arg| arg.range.map_or(0.0, |range| range.default))
            .collect()
    }

    /// The call as it would be written with `values`, e.g. `circle(50, 50, 40)`.
    /// Whole-step arguments are rounded; fine-step ones keep one decimal.
    pub fn call_with(&self, values: &[f32]) -> String {
        let args: Vec<String> = self
            .args
            .iter()
            .zip(values)
            .map(|(arg, value)| match arg.range {
                Some(range) if range.step < 1.0 => format!("{:.1}", value),
                _ => format!("{}", value.round() as i64),
            })
            .collect();
        format!("{}({})", self.name, args.join(", "))
    }
}

pub static FUNCTIONS: &[FunctionDoc] = &[
    FunctionDoc {
        name: "arc",
        description: "Draws an arc (part of a circle or ellipse)",
        args: &[
            slider("x", "x position of the center", ArgRange::new(0.0, 100.0, 50.0, 1.0)),
            slider("y", "y position of the center", ArgRange::new(0.0, 100.0, 50.0, 1.0)),
            slider("w", "width of the arc", ArgRange::new(10.0, 100.0, 80.0, 1.0)),
            slider("h", "height of the arc", ArgRange::new(10.0, 100.0, 80.0, 1.0)),
            slider("start", "angle to start (in radians)", ArgRange::new(0.0, 6.28, 0.0, 0.1)),
            slider("stop", "angle to stop (in radians)", ArgRange::new(0.0, 6.28, 3.14, 0.1)),
        ],
        example: Some("arc(50, 50, 80, 80, 0, PI)"),
    },
    FunctionDoc {
        name: "circle",
        description: "Draws a circle on the screen",
        args: &[
            slider("x", "x position of the center", ArgRange::new(0.0, 100.0, 50.0, 1.0)),
            slider("y", "y position of the center", ArgRange::new(0.0, 100.0, 50.0, 1.0)),
            slider("d", "diameter (size) of the circle", ArgRange::new(5.0, 90.0, 40.0, 1.0)),
        ],
        example: Some("circle(200, 200, 50)"),
    },
    FunctionDoc {
        name: "ellipse",
        description: "Draws an oval shape",
        args: &[
            slider("x", "x position of the center", ArgRange::new(0.0, 100.0, 50.0, 1.0)),
            slider("y", "y position of the center", ArgRange::new(0.0, 100.0, 50.0, 1.0)),
            slider("w", "width", ArgRange::new(5.0, 100.0, 70.0, 1.0)),
            slider("h", "height", ArgRange::new(5.0, 100.0, 40.0, 1.0)),
        ],
        example: Some("ellipse(200, 200, 80, 50)"),
    },
    FunctionDoc {
        name: "rect",
        description: "Draws a rectangle",
        args: &[
            slider("x", "x of the top-left corner", ArgRange::new(0.0, 90.0, 20.0, 1.0)),
            slider("y", "y of the top-left corner", ArgRange::new(0.0, 90.0, 30.0, 1.0)),
            slider("w", "width", ArgRange::new(5.0, 80.0, 60.0, 1.0)),
            slider("h", "height", ArgRange::new(5.0, 80.0, 40.0, 1.0)),
        ],
        example: Some("rect(100, 100, 80, 60)"),
    },
    FunctionDoc {
        name: "square",
        description: "Draws a square with equal sides",
        args: &[
            slider("x", "x of the top-left corner", ArgRange::new(0.0, 90.0, 25.0, 1.0)),
            slider("y", "y of the top-left corner", ArgRange::new(0.0, 90.0, 25.0, 1.0)),
            slider("s", "length of each side", ArgRange::new(5.0, 80.0, 50.0, 1.0)),
        ],
        example: Some("square(100, 100, 50)"),
    },
    FunctionDoc {
        name: "line",
        description: "Draws a straight line between two points",
        args: &[
            slider("x1", "x of the start point", ArgRange::new(0.0, 100.0, 15.0, 1.0)),
            slider("y1", "y of the start point", ArgRange::new(0.0, 100.0, 80.0, 1.0)),
            slider("x2", "x of the end point", ArgRange::new(0.0, 100.0, 85.0, 1.0)),
            slider("y2", "y of the end point", ArgRange::new(0.0, 100.0, 25.0, 1.0)),
        ],
        example: Some("line(0, 0, 100, 100)"),
    },
    FunctionDoc {
        name: "triangle",
        description: "Draws a triangle from three corners",
        args: &[
            arg("x1", "x of the first corner"),
            arg("y1", "y of the first corner"),
            arg("x2", "x of the second corner"),
            arg("y2", "y of the second corner"),
            arg("x3", "x of the third corner"),
            arg("y3", "y of the third corner"),
        ],
        example: Some("triangle(100, 200, 150, 100, 200, 200)"),
    },
    FunctionDoc {
        name: "fill",
        description: "Picks the color that fills shapes",
        args: &[
            slider("r", "red (0-255), or gray if it is the only number", ArgRange::new(0.0, 255.0, 255.0, 1.0)),
            slider("g", "green (0-255), optional", ArgRange::new(0.0, 255.0, 120.0, 1.0)),
            slider("b", "blue (0-255), optional", ArgRange::new(0.0, 255.0, 60.0, 1.0)),
        ],
        example: Some("fill(255, 0, 0) // red"),
    },
    FunctionDoc {
        name: "stroke",
        description: "Picks the color of outlines",
        args: &[
            slider("r", "red (0-255), or gray if it is the only number", ArgRange::new(0.0, 255.0, 40.0, 1.0)),
            slider("g", "green (0-255), optional", ArgRange::new(0.0, 255.0, 90.0, 1.0)),
            slider("b", "blue (0-255), optional", ArgRange::new(0.0, 255.0, 220.0, 1.0)),
        ],
        example: Some("stroke(0) // black outline"),
    },
    FunctionDoc {
        name: "strokeWeight",
        description: "Sets how thick lines and outlines are",
        args: &[
            slider("weight", "thickness in pixels", ArgRange::new(1.0, 20.0, 4.0, 1.0)),
        ],
        example: Some("strokeWeight(4)"),
    },
    FunctionDoc {
        name: "background",
        description: "Paints the whole canvas with one color",
        args: &[
            slider("r", "red (0-255), or gray if it is the only number", ArgRange::new(0.0, 255.0, 220.0, 1.0)),
            slider("g", "green (0-255), optional", ArgRange::new(0.0, 255.0, 220.0, 1.0)),
            slider("b", "blue (0-255), optional", ArgRange::new(0.0, 255.0, 220.0, 1.0)),
        ],
        example: Some("background(220) // light gray"),
    },
    FunctionDoc {
        name: "noFill",
        description: "Leaves shapes see-through inside",
        args: &[],
        example: Some("noFill()"),
    },
    FunctionDoc {
        name: "noStroke",
        description: "Draws shapes without an outline",
        args: &[],
        example: Some("noStroke()"),
    },
    FunctionDoc {
        name: "translate",
        description: "Moves the starting point for drawing",
        args: &[
            arg("x", "how far to move right"),
            arg("y", "how far to move down"),
        ],
        example: Some("translate(200, 200)"),
    },
    FunctionDoc {
        name: "rotate",
        description: "Turns everything drawn after it",
        args: &[
            arg("angle", "how far to turn, in radians"),
        ],
        example: Some("rotate(PI / 4) // 45 degrees"),
    },
    FunctionDoc {
        name: "scale",
        description: "Makes everything drawn after it bigger or smaller",
        args: &[
            arg("x", "how much to stretch sideways"),
            arg("y", "how much to stretch up and down, optional"),
        ],
        example: Some("scale(2) // twice as big"),
    },
    FunctionDoc {
        name: "push",
        description: "Remembers the current drawing settings",
        args: &[],
        example: Some("push()"),
    },
    FunctionDoc {
        name: "pop",
        description: "Goes back to the settings saved by push()",
        args: &[],
        example: Some("pop()"),
    },
    FunctionDoc {
        name: "random",
        description: "Picks a random number",
        args: &[
            arg("min", "smallest value (or the biggest if it is the only number)"),
            arg("max", "biggest value, optional"),
        ],
        example: Some("random(100) // 0 up to 100"),
    },
    FunctionDoc {
        name: "map",
        description: "Converts a number from one range to another",
        args: &[
            arg("value", "the number to convert"),
            arg("start1", "start of the old range"),
            arg("stop1", "end of the old range"),
            arg("start2", "start of the new range"),
            arg("stop2", "end of the new range"),
        ],
        example: Some("map(mouseX, 0, 400, 0, 255)"),
    },
    FunctionDoc {
        name: "constrain",
        description: "Keeps a number inside a range",
        args: &[
            arg("n", "the number to keep in range"),
            arg("low", "smallest allowed value"),
            arg("high", "biggest allowed value"),
        ],
        example: Some("constrain(x, 0, 400)"),
    },
    FunctionDoc {
        name: "dist",
        description: "Measures the distance between two points",
        args: &[
            arg("x1", "x of the first point"),
            arg("y1", "y of the first point"),
            arg("x2", "x of the second point"),
            arg("y2", "y of the second point"),
        ],
        example: Some("dist(0, 0, mouseX, mouseY)"),
    },
    FunctionDoc {
        name: "lerp",
        description: "Finds a number part of the way between two numbers",
        args: &[
            arg("start", "first number"),
            arg("stop", "second number"),
            arg("amt", "how far between them (0.0 to 1.0)"),
        ],
        example: Some("lerp(0, 100, 0.5) // 50"),
    },
    FunctionDoc {
        name: "text",
        description: "Writes words on the canvas",
        args: &[
            arg("str", "the words to show"),
            arg("x", "x position"),
            arg("y", "y position"),
        ],
        example: Some("text(\"Hello!\", 200, 200)"),
    },
    FunctionDoc {
        name: "textSize",
        description: "Sets how big text is",
        args: &[
            arg("size", "font size in pixels"),
        ],
        example: Some("textSize(32)"),
    },
    FunctionDoc {
        name: "textAlign",
        description: "Sets how text lines up",
        args: &[
            arg("horizAlign", "LEFT, CENTER or RIGHT"),
            arg("vertAlign", "TOP, CENTER or BOTTOM"),
        ],
        example: Some("textAlign(CENTER, CENTER)"),
    },
    FunctionDoc {
        name: "createCanvas",
        description: "Makes the drawing area",
        args: &[
            arg("w", "width in pixels"),
            arg("h", "height in pixels"),
        ],
        example: Some("createCanvas(400, 400)"),
    },
    FunctionDoc {
        name: "frameRate",
        description: "Sets how fast the animation runs",
        args: &[
            arg("fps", "frames per second"),
        ],
        example: Some("frameRate(60)"),
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static FunctionDoc>> =
    Lazy::new(|| FUNCTIONS.iter().map(|doc| (doc.name, doc)).collect());

static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([a-zA-Z_][a-zA-Z0-9_]*)\s*\(").expect("function call regex"));

pub fn lookup(name: &str) -> Option<&'static FunctionDoc> {
    BY_NAME.get(name).copied()
}

/// Documented functions called at least `min_count` times in `code`,
/// most used first.
pub fn find_frequent_functions(code: &str, min_count: usize) -> Vec<(&'static FunctionDoc, usize)> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();

    for caps in CALL_RE.captures_iter(code) {
        if let Some(doc) = caps.get(1).and_then(|m| lookup(m.as_str())) {
            *counts.entry(doc.name).or_insert(0) += 1;
        }
    }

    let mut frequent: Vec<_> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .filter_map(|(name, count)| lookup(name).map(|doc| (doc, count)))
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name.cmp(b.0.name)));
    frequent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(lookup("circle").map(|d| d.name), Some("circle"));
        assert!(lookup("Circle").is_none());
        assert!(lookup("setup").is_none());
    }

    #[test]
    fn names_are_unique() {
        assert_eq!(BY_NAME.len(), FUNCTIONS.len());
    }

    #[test]
    fn signature_lists_args() {
        assert_eq!(lookup("rect").unwrap().signature(), "rect(x, y, w, h)");
        assert_eq!(lookup("noFill").unwrap().signature(), "noFill()");
    }

    #[test]
    fn frequent_functions_are_counted_and_sorted() {
        let code = "
            function draw() {
              fill(255); circle(10, 10, 5);
              fill(0);   circle(20, 20, 5);
              fill(128); circle(30, 30, 5);
              fill (64); circle(40, 40, 5);
              fill(32);
              rect(0, 0, 1, 1);
              myHelper(); myHelper(); myHelper(); myHelper();
            }";
        let frequent = find_frequent_functions(code, 4);
        let names: Vec<_> = frequent.iter().map(|(doc, count)| (doc.name, *count)).collect();
        assert_eq!(names, vec![("fill", 5), ("circle", 4)]);
    }

    #[test]
    fn shape_and_color_functions_are_playable() {
        for name in ["arc", "circle", "ellipse", "rect", "square", "line", "strokeWeight"] {
            let doc = lookup(name).unwrap();
            assert!(doc.is_playable(), "{name} has no sliders");
            assert_eq!(doc.preview(), Preview::Shape);
        }
        for name in ["fill", "stroke", "background"] {
            assert_eq!(lookup(name).unwrap().preview(), Preview::Color);
        }
        assert!(!lookup("random").unwrap().is_playable());
        assert!(!lookup("noFill").unwrap().is_playable());
    }

    #[test]
    fn defaults_sit_inside_their_ranges() {
        for doc in FUNCTIONS {
            for arg in doc.args {
                if let Some(range) = arg.range {
                    assert!(range.min <= range.default && range.default <= range.max);
                    assert!(range.step > 0.0);
                }
            }
        }
    }

    #[test]
    fn call_is_written_with_slider_values() {
        let circle = lookup("circle").unwrap();
        assert_eq!(circle.call_with(&circle.default_values()), "circle(50, 50, 40)");
        assert_eq!(circle.call_with(&[12.4, 87.6, 30.0]), "circle(12, 88, 30)");

        let arc = lookup("arc").unwrap();
        assert_eq!(
            arc.call_with(&[50.0, 50.0, 80.0, 80.0, 0.0, 3.14]),
            "arc(50, 50, 80, 80, 0.0, 3.1)"
        );
    }

    #[test]
    fn nothing_frequent_in_short_code() {
        assert!(find_frequent_functions("background(0);", 4).is_empty());
    }
}
