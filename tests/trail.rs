use calltrail::frame::{Frame, FrameProvider, Unavailable};
use calltrail::rules::Rules;
use calltrail::trail::{build, strip_line_numbers, Trail};

fn stack(frames: &[(&str, u32)]) -> impl Fn(usize) -> Option<Frame> {
    let frames: Vec<Frame> = frames
        .iter()
        .map(|(function, line)| Frame::new(*function, "src/app.rs", *line))
        .collect();
    move |skip| frames.get(skip).cloned()
}

fn walk<P: FrameProvider>(provider: &P, rules: &Rules) -> Trail {
    build(provider, rules).expect("trace was suppressed")
}

#[test]
fn unfiltered_chain_lists_every_caller_innermost_first() {
    let provider = stack(&[("app::leaf", 3), ("app::mid", 7), ("app::root", 9)]);
    let trail = walk(&provider, &Rules::new());

    assert_eq!(trail.breadcrumb(), "[leaf:3] (mid:7) (root:9)");
    assert_eq!(trail.entries().len(), 3);
    assert_eq!(trail.depth(), 2);
}

#[test]
fn outermost_caller_has_no_depth() {
    let provider = stack(&[("app::main", 4)]);
    let trail = walk(&provider, &Rules::new());

    assert_eq!(trail.breadcrumb(), "[main:4]");
    assert_eq!(trail.depth(), 0);
}

#[test]
fn exclude_on_first_candidate_suppresses_the_trace() {
    let provider = stack(&[("app::blocked_fn", 3), ("app::root", 9)]);
    let mut rules = Rules::new();
    rules.add_exclude("blocked_fn");

    assert!(build(&provider, &rules).is_none());
}

#[test]
fn exclude_after_skipped_frames_still_suppresses() {
    let provider = stack(&[
        ("calltrail::logger::Logger<P,F>::trace", 120),
        ("app::shim", 2),
        ("app::blocked_fn", 3),
        ("app::root", 9),
    ]);
    let mut rules = Rules::new();
    rules.add_skip("shim");
    rules.add_exclude("blocked_fn");

    assert!(build(&provider, &rules).is_none());
}

#[test]
fn exclude_further_up_hides_the_frame_but_keeps_its_depth() {
    let provider = stack(&[("app::leaf", 3), ("app::blocked_fn", 7), ("app::root", 9)]);
    let mut rules = Rules::new();
    rules.add_exclude("blocked_fn");

    let trail = walk(&provider, &rules);
    assert_eq!(trail.breadcrumb(), "[leaf:3] (root:9)");
    assert_eq!(trail.depth(), 2);
    assert_eq!(trail.walked(), 3);
}

#[test]
fn break_stops_the_walk_and_keeps_what_was_gathered() {
    let provider = stack(&[
        ("app::leaf", 3),
        ("app::mid", 7),
        ("framework::runner", 40),
        ("app::main", 2),
    ]);
    let mut rules = Rules::new();
    rules.add_break("framework::");

    let trail = walk(&provider, &rules);
    assert_eq!(trail.breadcrumb(), "[leaf:3] (mid:7)");
    assert_eq!(trail.depth(), 1);
}

#[test]
fn break_on_first_candidate_yields_an_empty_trail() {
    let provider = stack(&[("framework::runner", 40), ("app::main", 2)]);
    let mut rules = Rules::new();
    rules.add_break("framework::");

    let trail = walk(&provider, &rules);
    assert!(trail.is_empty());
    assert_eq!(trail.breadcrumb(), "");
    assert_eq!(trail.depth(), 0);
}

#[test]
fn skip_removes_one_frame_per_match() {
    let provider = stack(&[("app::leaf", 3), ("app::helper", 5), ("app::root", 9)]);
    let mut rules = Rules::new();
    rules.add_skip("helper");

    let trail = walk(&provider, &rules);
    assert_eq!(trail.breadcrumb(), "[leaf:3] (root:9)");
    assert_eq!(trail.walked(), 3);
    assert_eq!(trail.initial_skip_count(), 0);
    assert_eq!(trail.later_skip_count(), 1);
}

#[test]
fn skipped_helpers_render_at_the_depth_of_a_direct_call() {
    let direct = walk(&stack(&[("app::caller", 12), ("app::main", 2)]), &Rules::new());

    for helpers in 1..=4 {
        let mut frames: Vec<(String, u32)> = (1..=helpers)
            .map(|i| (format!("app::absorbed_{}", i), i as u32))
            .collect();
        frames.push(("app::caller".to_string(), 12));
        frames.push(("app::main".to_string(), 2));
        let borrowed: Vec<(&str, u32)> = frames.iter().map(|(f, l)| (f.as_str(), *l)).collect();

        let mut rules = Rules::new();
        rules.set_skips((1..=helpers).map(|i| format!("absorbed_{}'", i)));

        let trail = walk(&stack(&borrowed), &rules);
        assert_eq!(trail.breadcrumb(), direct.breadcrumb(), "{} helpers", helpers);
        assert_eq!(trail.depth(), direct.depth(), "{} helpers", helpers);
        assert_eq!(trail.initial_skip_count(), helpers, "{} helpers", helpers);
    }
}

#[test]
fn skipped_frames_between_survivors_do_not_count() {
    let plain = walk(
        &stack(&[("app::leaf", 3), ("app::root", 9), ("app::main", 1)]),
        &Rules::new(),
    );

    let mut rules = Rules::new();
    rules.set_skips(["adapter_one", "adapter_two"]);
    let skipped = walk(
        &stack(&[
            ("app::leaf", 3),
            ("app::adapter_one", 5),
            ("app::root", 9),
            ("app::adapter_two", 6),
            ("app::main", 1),
        ]),
        &rules,
    );

    assert_eq!(skipped.breadcrumb(), plain.breadcrumb());
    assert_eq!(skipped.depth(), plain.depth());
    assert_eq!(skipped.later_skip_count(), 2);
}

#[test]
fn logger_frames_are_skipped_before_the_caller() {
    let provider = stack(&[
        ("calltrail::trail::build", 130),
        ("calltrail::logger::Logger<P,F>::trace", 120),
        ("app::caller", 12),
        ("app::main", 2),
    ]);

    let trail = walk(&provider, &Rules::new());
    assert_eq!(trail.breadcrumb(), "[caller:12] (main:2)");
    assert_eq!(trail.initial_skip_count(), 2);
    assert_eq!(trail.depth(), 1);
}

#[test]
fn closures_show_up_as_placeholders() {
    let provider = stack(&[("app::run::{{closure}}", 5), ("app::run", 4)]);
    let trail = walk(&provider, &Rules::new());

    assert_eq!(trail.breadcrumb(), "[{closure}:5] (run:4)");
}

#[test]
fn harness_wrapper_closure_is_dropped_at_the_boundary() {
    let provider = stack(&[
        ("calltrail::logger::Logger<P,F>::trace", 120),
        ("tests::case", 5),
        ("tests::case::{{closure}}", 3),
        ("core::ops::function::FnOnce::call_once", 250),
        ("core::ops::function::FnOnce::call_once", 250),
        ("test::__rust_begin_short_backtrace", 600),
    ]);

    let trail = walk(&provider, &Rules::new());
    assert_eq!(trail.breadcrumb(), "[case:5]");
    assert_eq!(trail.depth(), 0);
    assert_eq!(trail.later_skip_count(), 0);
}

#[test]
fn harness_wrapper_below_nested_calls_is_dropped() {
    let provider = stack(&[
        ("tests::helper", 8),
        ("tests::case", 5),
        ("tests::case::{closure#0}", 3),
        ("core::ops::function::FnOnce::call_once", 250),
        ("test::__rust_begin_short_backtrace", 600),
    ]);

    let trail = walk(&provider, &Rules::new());
    assert_eq!(trail.breadcrumb(), "[helper:8] (case:5)");
    assert_eq!(trail.depth(), 1);
}

#[test]
fn other_closures_at_the_boundary_are_kept() {
    // A thread closure does not call the function it is defined in.
    let provider = stack(&[
        ("app::work", 8),
        ("app::main::{{closure}}", 3),
        ("std::sys::backtrace::__rust_begin_short_backtrace", 600),
    ]);
    let trail = walk(&provider, &Rules::new());
    assert_eq!(trail.breadcrumb(), "[work:8] ({closure}:3)");
    assert_eq!(trail.depth(), 1);

    // Without a break the wrapper can't be told apart from user code.
    let provider = stack(&[("tests::case", 5), ("tests::case::{{closure}}", 3)]);
    let trail = walk(&provider, &Rules::new());
    assert_eq!(trail.breadcrumb(), "[case:5] ({closure}:3)");

    // Anything kept after it means it wasn't at the boundary.
    let provider = stack(&[
        ("tests::case", 5),
        ("tests::case::{{closure}}", 3),
        ("tests::driver", 12),
        ("test::__rust_begin_short_backtrace", 600),
    ]);
    let trail = walk(&provider, &Rules::new());
    assert_eq!(trail.breadcrumb(), "[case:5] ({closure}:3) (driver:12)");
}

#[test]
fn unavailable_stack_gives_an_empty_trail() {
    let trail = walk(&Unavailable, &Rules::new());
    assert!(trail.is_empty());
    assert_eq!(trail.depth(), 0);

    let failing = |_: usize| -> Option<Frame> { None };
    let trail = walk(&failing, &Rules::new());
    assert_eq!(trail.breadcrumb(), "");
    assert_eq!(trail.walked(), 0);
}

#[test]
fn line_numbers_can_be_ignored() {
    let provider = stack(&[("app::leaf", 3), ("app::root", 9)]);
    let trail = walk(&provider, &Rules::new());

    assert_eq!(strip_line_numbers(&trail.breadcrumb()), "[leaf:_] (root:_)");
    assert_eq!(strip_line_numbers("no breadcrumb: 12"), "no breadcrumb: 12");
}
