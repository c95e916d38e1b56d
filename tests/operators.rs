#[macro_use]
mod cases;

test_case!(
    constant_arithmetic,
    input: "60,24,*,7,*",
    residual: "10080",
);

test_case!(
    named_constants,
    input: "WEEK,DAY,/",
    residual: "7",
);

test_case!(
    fold_stops_at_symbol,
    input: "5,3,+,foo,*",
    residual: "8,foo,*",
);

test_case!(
    additive_identity,
    input: "qps,0,+,1,*",
    residual: "qps",
);

test_case!(
    multiply_by_zero_drops_symbol,
    input: "0,qps,*,5,+",
    residual: "5",
);

test_case!(
    divide_by_zero_is_unknown,
    input: "qps,0,/",
    residual: "UNKN",
);

test_case!(
    unknown_propagates,
    input: "UNKN,2,+,3,*",
    residual: "UNKN",
);

test_case!(
    if_with_known_condition,
    input: "1,0,GT,qps,-2,IF",
    residual: "qps",
);

test_case!(
    if_with_symbolic_condition,
    input: "qps,1,0,IF",
    residual: "qps,1,0,IF",
);

test_case!(
    limit_with_known_bounds,
    input: "foo,6,5,10,LIMIT,+",
    residual: "foo,6,+",
);

test_case!(
    same_symbol_comparison,
    input: "x,x,EQ,x,x,LT,+",
    residual: "1",
);

test_case!(
    nan_skipping_max,
    input: "UNKN,qps,MAXNAN",
    residual: "qps",
);

test_case!(
    median_of_known_window,
    input: "a,b,c,d,e,f,13,42,2,MEDIAN",
    residual: "a,b,c,d,e,f,27.5",
);

test_case!(
    sort_then_subtract,
    input: "42,13,2,SORT,-",
    residual: "-29",
);

test_case!(
    roll_symbols,
    input: "a,b,c,d,3,1,ROLL",
    residual: "a,d,b,c",
);

test_case!(
    percentile,
    input: "15,20,35,40,50,30,5,PERCENT",
    residual: "20",
);

test_case!(
    symbolic_window_defers,
    input: "a,b,c,3,AVG",
    residual: "a,b,c,3,AVG",
);

test_case!(
    time_names_stay_for_evaluate,
    input: "TIME,60,+",
    residual: "TIME,60,+",
);

test_case!(
    empty_expression,
    input: "",
    error: "syntax error : empty expression",
);

test_case!(
    empty_token,
    input: "1,,2",
    error: "syntax error : empty token",
);

test_case!(
    missing_operands,
    input: "4,*",
    error: "syntax error : not enough parameters: operator * requires 2 operands",
);

test_case!(
    window_larger_than_stack,
    input: "1,2,3,4,AVG",
    error: "syntax error : AVG operand requires 4 items, but only 3 on stack",
);

test_case!(
    fractional_count,
    input: "1,2,3,1.5,SORT",
    error: "syntax error : SORT operator requires positive finite integer: 1.5",
);

test_case!(
    percentile_above_hundred,
    input: "1,2,3,101,3,PERCENT",
    error: "syntax error : PERCENT operator requires percentile no greater than 100: 101",
);

test_case!(
    trend_of_number,
    input: "5,60,TREND",
    error: "syntax error : TREND operator requires label but found number: 5",
);
