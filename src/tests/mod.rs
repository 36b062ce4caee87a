use crate::{run_script, Error, TestContext};

fn run(source: &str) -> Result<TestContext, Error> {
    let mut ctx = TestContext::new();
    run_script("test.js", source, &mut ctx)?;
    Ok(ctx)
}

fn output(source: &str) -> String {
    match run(source) {
        Ok(ctx) => ctx.print,
        Err(e) => panic!("script failed: {}", e),
    }
}

fn error_code(source: &str) -> u32 {
    match run(source) {
        Ok(ctx) => panic!("script should fail, printed {:?}", ctx.print),
        Err(e) => e.code(),
    }
}

#[test]
fn counter_script() {
    assert_eq!(output(include_str!("../../scripts/counter.js")), "-2 201 -4\n");
}

#[test]
fn fibonacci_script() {
    assert_eq!(output(include_str!("../../scripts/fibonacci.js")), "55\n");
}

#[test]
fn exp_script() {
    assert_eq!(
        output(include_str!("../../scripts/exp.js")),
        "4294967296\n256\n"
    );
}

#[test]
fn object_script() {
    let ctx = run(include_str!("../../scripts/object.js")).unwrap();
    assert_eq!(ctx.lines(), vec!["o1", "o2", "o3", "o2"]);
}

#[test]
fn counters_do_not_share_state() {
    let out = output(
        "function make(start) {
            return function () {
                start = start + 1
                return start
            }
        }
        var a = make(0)
        var b = make(0)
        a()
        a()
        print(a(), b())",
    );
    assert_eq!(out, "3 1\n");
}

#[test]
fn closures_see_later_updates() {
    let out = output(
        "var n = 1
        function get() { return n }
        n = 2
        print(get())",
    );
    assert_eq!(out, "2\n");
}

#[test]
fn shadowing_keeps_outer_binding() {
    let out = output(
        "var x = 1
        function f(x) {
            x = x + 10
            return x
        }
        {
            var x = 5
            print(x)
        }
        print(f(2), x)",
    );
    assert_eq!(out, "5\n12 1\n");
}

#[test]
fn map_calls_back_into_scripts() {
    let out = output(
        "var offset = 10
        var items = map(function (e) { return e + offset }, [1, 2, 3])
        print(items, len(items))",
    );
    assert_eq!(out, "[11, 12, 13] 3\n");
}

#[test]
fn lists_and_indexing() {
    let out = output(
        "var l = List(3)
        l[0] = 4
        l[2] = \"end\"
        print(l, l[0] * 2, \"abc\"[1])",
    );
    assert_eq!(out, "[4, null, end] 8 b\n");
}

#[test]
fn strings_and_logic() {
    let out = output(
        "var name = \"counter\"
        print(\"value: \" + 3, name == \"counter\", !(1 > 2) && true, \"a\" < \"b\")
        if false || 2 >= 2 { print(\"yes\") } else { print(\"no\") }",
    );
    assert_eq!(out, "value: 3 true true true\nyes\n");
}

#[test]
fn object_keys_keep_insertion_order() {
    let out = output(
        "var o = Object()
        o.b = 1
        o.a = 2
        o.b = 3
        print(keys(o), o)",
    );
    assert_eq!(out, "[b, a] {b: 3, a: 2}\n");
}

#[test]
fn functions_without_return_give_null() {
    assert_eq!(output("function f() { } print(f())"), "null\n");
}

#[test]
fn runtime_errors() {
    assert_eq!(error_code("print(inc3())"), 12);
    assert_eq!(error_code("var o = Object() print(o.missing)"), 13);
    assert_eq!(error_code("print(1 + true)"), 14);
    assert_eq!(error_code("if 1 { }"), 15);
    assert_eq!(error_code("var x = 3 x()"), 16);
    assert_eq!(error_code("function f(a) { } f()"), 17);
    assert_eq!(error_code("var x = 3 x.y = 1"), 18);
    assert_eq!(error_code("print(3[0])"), 19);
    assert_eq!(error_code("print([1][0.5])"), 20);
    assert_eq!(error_code("print([1, 2][2])"), 21);
    assert_eq!(error_code("print(len(3))"), 22);
}

#[test]
fn undefined_names_suggest_similar_ones() {
    let e = run("var inc1 = 1\nprint(inc3)").err().unwrap();
    assert_eq!(e.code(), 12);
    assert_eq!(e.message(), "Undefined variable inc3");
    let mut rendered = Vec::new();
    e.write("var inc1 = 1\nprint(inc3)", &mut rendered).unwrap();
    assert!(String::from_utf8_lossy(&rendered).contains("inc1"));
}

#[test]
fn output_before_an_error_is_kept() {
    let mut ctx = TestContext::new();
    let result = run_script("test.js", "print(1)\nprint(missing)", &mut ctx);
    assert!(result.is_err());
    assert_eq!(ctx.print, "1\n");
}

#[test]
fn top_level_return_stops_the_program() {
    let out = output(
        "var i = 0
        while true {
            i = i + 1
            if i == 3 { return }
        }
        print(\"unreachable\")",
    );
    assert_eq!(out, "");
}

#[test]
fn self_referencing_containers_print() {
    let out = output(
        "var l = [1]
        l[0] = l
        print(l)
        var o = Object()
        o.me = o
        o.items = [o, 2]
        console.log(o)
        print(\"list: \" + l)",
    );
    assert_eq!(
        out,
        "[[Circular]]\n{me: [Circular], items: [[Circular], 2]}\nlist: [[Circular]]\n"
    );
}

#[test]
fn infinities_print_by_name() {
    assert_eq!(output("print(1 / 0, -1 / 0)"), "Infinity -Infinity\n");
}

#[test]
fn oversized_lists_are_rejected() {
    assert_eq!(error_code("var l = List(1000000000000000)"), 22);
    assert_eq!(output("print(len(List(100000)))"), "100000\n");
}
