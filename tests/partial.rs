use pretty_assertions::assert_eq;
use tsrpn::{Bindings, Program};

#[macro_use]
mod cases;

test_case!(
    bind_one_of_two,
    input: "foo,1000,*,bar,/",
    bindings: [("bar", 16.0)],
    partial: "foo,1000,*,16,/",
);

test_case!(
    bind_enables_fold,
    input: "a,b,c,d,+,+,+",
    bindings: [("c", 3.0), ("d", 4.0)],
    partial: "a,b,7,+,+",
);

test_case!(
    bind_selects_branch,
    input: "x,a,b,IF",
    bindings: [("x", 0.0)],
    partial: "b",
);

test_case!(
    bind_completes_window,
    input: "a,b,c,3,MEDIAN",
    bindings: [("a", 3.0), ("b", 1.0), ("c", 2.0)],
    partial: "2",
);

test_case!(
    time_is_left_for_evaluate,
    input: "TIME,a,+",
    bindings: [("TIME", 0.0), ("a", 1.0)],
    partial: "TIME,1,+",
);

#[test]
fn test_stepwise_and_single_partial_agree() {
    let program = cases::build("a,b,*,c,d,/,+,e,MAX");
    let all = cases::bindings(&[("a", 3.0), ("d", 1.0), ("e", 2.0)]);
    let mut stepwise = program.clone();
    for (name, value) in [("a", 3.0), ("d", 1.0), ("e", 2.0)] {
        stepwise = stepwise
            .partial(&Bindings::new().bind(name, value))
            .unwrap();
    }
    assert_eq!(
        stepwise.to_string(),
        program.partial(&all).unwrap().to_string()
    );
}

#[test]
fn test_residual_is_a_program() {
    let program = cases::build("qps,1000,*,limit,GT");
    let partial = program
        .partial(&Bindings::new().bind("limit", 50))
        .unwrap();
    let reparsed: Program = partial.to_string().parse().unwrap();
    assert_eq!(reparsed, partial);
    assert_eq!(reparsed.open_bindings(), ["qps"]);
}

#[test]
fn test_open_bindings_shrink() {
    let program = cases::build("a,b,+,c,*");
    assert_eq!(program.open_bindings(), ["a", "b", "c"]);

    let partial = program.partial(&Bindings::new().bind("b", 1)).unwrap();
    assert_eq!(partial.open_bindings(), ["a", "c"]);

    let done = partial
        .partial(&Bindings::new().bind("a", 1).bind("c", 2))
        .unwrap();
    assert!(done.open_bindings().is_empty());
    assert_eq!(done.to_string(), "4");
}

#[test]
fn test_partial_keeps_options() {
    let options = tsrpn::ProgramOptions::default()
        .with_delimiter(';')
        .with_seconds_per_interval(60.0);
    let program = Program::with_options("a;STEPWIDTH;*", options).unwrap();
    assert_eq!(program.to_string(), "a;60;*");

    let partial = program.partial(&Bindings::new().bind("a", 2)).unwrap();
    assert_eq!(partial.to_string(), "120");
    assert_eq!(partial.options(), &options);
}

#[test]
fn test_residuals_are_fixed_points() {
    let corpus = [
        "5,3,+,foo,*",
        "a,b,+,2,1,ROLL",
        "a,b,EQ,2,COPY",
        "1,2,3,a,b,EQ,d,3,INDEX",
        "a,b,c,3,AVG",
        "13,a,ISINF,2,MEDIAN",
        "a,b,c,95,3,PERCENT",
        "a,7,+,3,5,IF",
        "x,0,10,LIMIT",
        "a,b,+,DUP",
        "a,b,+,DEPTH,+",
        "sam,600,TREND,x,+",
        "qps,1,0,IF",
        "TIME,60,+",
        "1,NOW",
    ];
    for source in corpus {
        let program = cases::build(source);
        let rendered = program.to_string();
        let again = program.partial(&Bindings::new()).unwrap();
        assert_eq!(again.to_string(), rendered, "partial of {}", source);
        assert_eq!(cases::build(&rendered).to_string(), rendered, "rebuild of {}", source);
    }
}
