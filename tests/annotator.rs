use sketch_studio::annotator::{
    BlockKind, ChangeSet, EditorCommand, HighlightController, classify_block,
    compute_change_blocks, compute_change_set, split_lines,
};
use std::time::{Duration, Instant};

fn set(indices: &[usize]) -> ChangeSet {
    indices.iter().copied().collect()
}

#[test]
fn modified_line_in_the_middle() {
    let previous = ["a", "b", "c"];
    let current = ["a", "x", "c"];

    assert_eq!(compute_change_set(&previous, &current), set(&[1]));

    let blocks = compute_change_blocks(&previous, &current);
    assert_eq!(blocks.len(), 1);
    assert_eq!((blocks[0].start_line, blocks[0].end_line), (1, 1));
    assert_eq!(blocks[0].kind, BlockKind::Modified);
}

#[test]
fn lines_appended_after_the_end() {
    let previous = ["a"];
    let current = ["a", "b", "c"];

    assert_eq!(compute_change_set(&previous, &current), set(&[1, 2]));

    let blocks = compute_change_blocks(&previous, &current);
    assert_eq!(blocks.len(), 1);
    assert_eq!((blocks[0].start_line, blocks[0].end_line), (1, 2));
    assert_eq!(blocks[0].kind, BlockKind::Added);
}

#[test]
fn function_definition_label_takes_priority() {
    let previous = ["function setup(){}"];
    let current = ["function setup(){}", "function draw(){ gravity = 0.1; }"];

    let blocks = compute_change_blocks(&previous, &current);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].label, "Added draw() function");
}

#[test]
fn plain_single_line_gets_generic_label() {
    let blocks = compute_change_blocks(&["let x = 1;"], &["let x = 2;"]);
    assert_eq!(blocks[0].label, "Modified line");
    assert_eq!(classify_block(&["let x = 2;"]), "Modified line");
}

#[test]
fn growing_program_with_same_prefix_only_adds() {
    let previous = split_lines("function setup() {\n  createCanvas(400, 400);\n}");
    let current = split_lines(
        "function setup() {\n  createCanvas(400, 400);\n}\nfunction draw() {\n  background(220);\n}",
    );

    let expected: ChangeSet = (previous.len()..current.len()).collect();
    assert_eq!(compute_change_set(&previous, &current), expected);
    for block in compute_change_blocks(&previous, &current) {
        assert_eq!(block.kind, BlockKind::Added);
    }
}

#[test]
fn equal_programs_produce_nothing() {
    let text = split_lines("function draw() {\n  circle(mouseX, mouseY, 20);\n}");
    assert!(compute_change_set(&text, &text).is_empty());
    assert!(compute_change_blocks(&text, &text).is_empty());
}

#[test]
fn computation_is_repeatable() {
    let previous = split_lines("a\nb\nc\nd\ne");
    let current = split_lines("a\nspeed = 3;\nc\nscore++;\ne\nf");
    assert_eq!(
        compute_change_blocks(&previous, &current),
        compute_change_blocks(&previous, &current)
    );
}

#[test]
fn new_cycle_keeps_a_single_auto_clear() {
    let mut ctl = HighlightController::new(Duration::from_secs(8), 3);
    let t0 = Instant::now();

    assert!(ctl.start_cycle("a\nb", "a\nB", t0));
    let t1 = t0 + Duration::from_millis(500);
    assert!(ctl.start_cycle("a\nB", "a\nB\nfill(255);", t1));

    // Only the second cycle's deadline is pending.
    assert_eq!(ctl.pending_deadline(), Some(t1 + Duration::from_secs(8)));

    assert!(!ctl.tick(t0 + Duration::from_secs(8)));
    assert!(ctl.highlight_visible());
    assert_eq!(ctl.blocks().len(), 1);
    assert_eq!(ctl.blocks()[0].label, "Changed colors");

    assert!(ctl.tick(t1 + Duration::from_secs(8)));
    assert!(!ctl.highlight_visible());
    assert!(ctl.pending_deadline().is_none());
}

#[test]
fn out_of_range_navigation_keeps_state() {
    let mut ctl = HighlightController::new(Duration::from_secs(8), 3);
    ctl.start_cycle("a\nb\nc", "A\nb\nC", Instant::now());
    ctl.navigate(1);
    ctl.take_commands();

    let before = ctl.state();
    ctl.navigate(2);
    ctl.navigate(99);
    assert_eq!(ctl.state(), before);
    assert_eq!(ctl.active_block_index(), 1);
    assert!(ctl.take_commands().is_empty());
}

#[test]
fn view_receives_decorations_then_scroll() {
    let mut ctl = HighlightController::new(Duration::from_secs(8), 2);
    ctl.start_cycle("a\nb\nc", "a\nb\nc\nd", Instant::now());

    let commands = ctl.take_commands();
    assert_eq!(commands[0], EditorCommand::Decorate(set(&[3])));
    assert!(matches!(
        commands[1],
        EditorCommand::ScrollTo {
            line: 3,
            margin: 2,
            ..
        }
    ));
}
