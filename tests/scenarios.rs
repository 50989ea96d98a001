mod cases;

use adex::{Options, RewriteOptions, Value, disjunctive_normal_form, push_down_not};
use cases::{REGISTRY, call, lit, path};
use indoc::indoc;

const ORDER: &str = indoc! {r#"
    {
        "order": {
            "customer": { "name": "Ada" },
            "items": [
                { "name": "pen", "price": 1.5, "qty": 2 },
                { "name": "ink", "price": 4, "qty": 1 }
            ],
            "placed": "2018-03-15T13:00:00.000Z"
        },
        "phones": ["555-1234", "nope", "555-9876"]
    }
"#};

scenario!(
    order_summary,
    memory: ORDER,
    expr: call(
        "concat",
        vec![
            path("order.customer.name"),
            lit(": "),
            call(
                "join",
                vec![
                    call("select", vec![path("order.items"), path("i"), path("i.name")]),
                    lit(", "),
                    lit(" and "),
                ],
            ),
        ],
    ),
    result: Ok(Value::text("Ada: pen and ink")),
);

scenario!(
    order_total,
    memory: ORDER,
    expr: call(
        "formatNumber",
        vec![
            call("sum", vec![call("select", vec![
                path("order.items"),
                path("i"),
                call("*", vec![path("i.price"), path("i.qty")]),
            ])]),
            lit(2),
        ],
    ),
    result: Ok(Value::text("7.00")),
);

scenario!(
    locale_from_options,
    memory: ORDER,
    expr: call("string", vec![lit(2.5)]),
    options: Options::with_locale("fr-FR"),
    result: Ok(Value::text("2,5")),
);

scenario!(
    null_substitution,
    memory: ORDER,
    expr: path("order.coupon"),
    options: Options::with_null_substitution(|p| Value::text(format!("{} is undefined", p))),
    result: Ok(Value::text("order.coupon is undefined")),
);

scenario!(
    branch_on_missing_value,
    memory: ORDER,
    expr: call(
        "if",
        vec![call("exists", vec![path("order.coupon")]), lit("discount"), lit("full price")],
    ),
    result: Ok(Value::text("full price")),
);

scenario!(
    filter_with_regex,
    memory: ORDER,
    expr: call(
        "where",
        vec![path("phones"), path("p"), call("isMatch", vec![path("p"), lit("^555-")])],
    ),
    result: Ok(Value::list([Value::text("555-1234"), Value::text("555-9876")])),
);

scenario!(
    json_path_wildcard,
    memory: ORDER,
    expr: call("jPath", vec![path("order"), lit("$.items[*].name")]),
    result: Ok(Value::list([Value::text("pen"), Value::text("ink")])),
);

scenario!(
    date_arithmetic,
    memory: ORDER,
    expr: call("addDays", vec![path("order.placed"), lit(1), lit("MM-dd-yy")]),
    result: Ok(Value::text("03-16-18")),
);

scenario!(
    unparseable_date,
    memory: ORDER,
    expr: call("addDays", vec![lit("bad"), lit(1)]),
    result: Err("Could not parse bad"),
);

#[test]
fn normalized_condition_agrees_with_original() {
    let big_order = call(">", vec![call("count", vec![path("order.items")]), lit(1)]);
    let has_coupon = call("exists", vec![path("order.coupon")]);
    let named = call("==", vec![path("order.customer.name"), lit("Ada")]);
    let either = call("||", vec![has_coupon, named]);
    let condition = call("!", vec![call("&&", vec![big_order, either])]);

    let pushed = push_down_not(&condition, &REGISTRY).unwrap();
    let normal =
        disjunctive_normal_form(&condition, &REGISTRY, &RewriteOptions::default()).unwrap();
    assert_eq!(normal.expr_type(), "||");

    let options = Options::default();
    let original = cases::run(&condition, ORDER, &options);
    assert_eq!(original, Ok(Value::Bool(false)));
    assert_eq!(cases::run(&pushed, ORDER, &options), original);
    assert_eq!(cases::run(&normal, ORDER, &options), original);
}
