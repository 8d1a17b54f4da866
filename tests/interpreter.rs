mod common;

#[cfg(test)]
mod interpreter_tests {
    use std::io;

    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::parser::Parser;
    use lox::resolver::Resolver;
    use lox::scanner::scan_tokens;
    use lox::value::Value;
    use lox::{Interpreter, RunConfig};

    use crate::common::{error_of, first_message, output_of, run_full};

    #[test]
    fn empty_program_does_nothing() {
        assert_eq!(output_of(""), "");
        assert_eq!(output_of("// only a comment\n"), "");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(
            output_of("print 1 + 2 * 3; print 7 / 2; print 2 ** 10; print 7 % 3; print -7 % 3;"),
            "7\n3.5\n1024\n1\n-1\n"
        );
    }

    #[test]
    fn division_and_modulo_by_zero_are_runtime_errors() {
        assert_eq!(first_message("print 1 / 0;"), "Division by zero.");
        assert_eq!(first_message("print 0 / 0;"), "Division by zero.");
        assert_eq!(first_message("print 5 % 0;"), "Modulo by zero.");
        assert_eq!(error_of("print 1 / 0;").exit_code(), 70);
    }

    #[test]
    fn plus_concatenates_strings_with_numbers() {
        assert_eq!(
            output_of("print \"a\" + \"b\"; print \"a\" + 1; print 2.5 + \"b\";"),
            "ab\na1\n2.5b\n"
        );
        assert_eq!(
            first_message("print \"x\" + true;"),
            "Operands must be two numbers or two strings."
        );
    }

    #[test]
    fn string_repetition() {
        assert_eq!(
            output_of("print \"ab\" * 3; print 3 * \"ab\"; print \"ab\" * 1; print \"ab\" * 0; print \"ab\" * -2;"),
            "ababab\nababab\nab\nab\nab\n"
        );
        assert_eq!(
            first_message("print \"ab\" * 1.5;"),
            "String multiplier must be an integer."
        );
    }

    #[test]
    fn oversized_string_repetition_is_a_runtime_error() {
        assert_eq!(
            first_message("print \"ab\" * (10 ** 19);"),
            "String repetition too large."
        );
        assert_eq!(
            first_message("print \"ab\" * 2000000000;"),
            "String repetition too large."
        );
        assert_eq!(error_of("print \"ab\" * (10 ** 19);").exit_code(), 70);
    }

    #[test]
    fn bitwise_and_shift_operators() {
        assert_eq!(
            output_of(
                "print 6 & 3; print 6 | 3; print 6 ^ 3; print 1 << 4; print -16 >> 2; print ~5; print 1 << 33;"
            ),
            "2\n7\n5\n16\n-4\n-6\n2\n"
        );
        assert_eq!(first_message("print 1.5 & 1;"), "Operands must be integers.");
    }

    #[test]
    fn bitwise_operands_saturate_at_i32_bounds() {
        assert_eq!(
            output_of("print 2147483648 | 0; print -2147483649 & -1; print ~4294967296;"),
            "2147483647\n-2147483648\n-2147483648\n"
        );
    }

    #[test]
    fn comparisons() {
        assert_eq!(
            output_of("print \"a\" < \"b\"; print 2 >= 2; print 3 < 1;"),
            "true\ntrue\nfalse\n"
        );
        assert_eq!(
            first_message("print 1 < \"a\";"),
            "Operands must be two numbers or two strings."
        );
    }

    #[test]
    fn equality_rules() {
        assert_eq!(
            output_of(
                "print nil == nil; print nil == 0; print 1 == 1; print \"a\" != \"b\"; print true == true;"
            ),
            "true\nfalse\ntrue\ntrue\ntrue\n"
        );
        assert_eq!(
            output_of("fun f() { return 1; } print f == f; class A {} print A() == A();"),
            "true\nfalse\n"
        );
        assert_eq!(
            first_message("print 1 == \"1\";"),
            "Cannot compare number with string."
        );
    }

    #[test]
    fn zero_is_falsy() {
        assert_eq!(
            output_of("print !0; print !\"\"; print !nil; if (0) print \"yes\"; else print \"no\";"),
            "true\nfalse\ntrue\nno\n"
        );
    }

    #[test]
    fn logical_operators_return_an_operand() {
        assert_eq!(
            output_of("print nil or \"x\"; print 1 and 2; print false and undefined;"),
            "x\n2\nfalse\n"
        );
    }

    #[test]
    fn ternary_and_comma() {
        assert_eq!(
            output_of("print true ? 1 : 2; print 0 ? \"y\" : \"n\"; print (1, 2);"),
            "1\nn\n2\n"
        );
    }

    #[test]
    fn prefix_and_postfix_increments() {
        assert_eq!(
            output_of("var x = 1; print x++; print x; print ++x; print x--; print --x;"),
            "1\n2\n3\n3\n1\n"
        );
        assert_eq!(output_of("{ var y = 5; y++; print y; }"), "6\n");

        assert_eq!(
            first_message("++1;"),
            "Operand of an increment operator must be a variable."
        );
        assert_eq!(
            first_message("var s = \"a\"; s++;"),
            "Operand must be a number."
        );
    }

    #[test]
    fn compound_assignment() {
        assert_eq!(
            output_of("var a = 2; a += 3; a *= 2; a **= 2; a -= 1; a /= 3; a %= 5; print a;"),
            "3\n"
        );
        assert_eq!(
            output_of("var b = 12; b &= 10; b |= 1; b ^= 3; b <<= 2; b >>= 1; print b;"),
            "20\n"
        );
        assert_eq!(
            output_of("class C {} var c = C(); c.n = 1; c.n += 2; print c.n;"),
            "3\n"
        );
        assert_eq!(first_message("x += 1;"), "Undefined variable 'x'.");
    }

    #[test]
    fn closures_capture_independent_state() {
        let source = r#"
fun makeCounter() {
  var i = 0;
  fun count() { i = i + 1; return i; }
  return count;
}
var a = makeCounter();
var b = makeCounter();
print a();
print a();
print b();
"#;

        assert_eq!(output_of(source), "1\n2\n1\n");
    }

    #[test]
    fn closures_see_later_assignments() {
        let source = r#"
fun make() {
  var x = 1;
  fun get() { return x; }
  x = 2;
  return get;
}
print make()();
"#;

        assert_eq!(output_of(source), "2\n");
    }

    #[test]
    fn resolution_is_static() {
        let source = r#"
var a = "global";
{
  fun showA() { print a; }
  showA();
  var a = "block";
  showA();
  print a;
}
"#;

        assert_eq!(output_of(source), "global\nglobal\nblock\n");
    }

    #[test]
    fn lambdas_are_values() {
        assert_eq!(
            output_of("var twice = fun (f, x) { return f(f(x)); }; print twice(fun (n) { return n * 3; }, 2);"),
            "18\n"
        );
    }

    #[test]
    fn break_and_continue() {
        assert_eq!(
            output_of(
                "for (var i = 0; i < 5; i = i + 1) { if (i == 1) continue; if (i == 3) break; print i; }"
            ),
            "0\n2\n"
        );
        assert_eq!(
            output_of("var i = 0; while (i < 3) { i = i + 1; if (i == 2) continue; print i; }"),
            "1\n3\n"
        );
    }

    #[test]
    fn break_leaves_only_the_innermost_loop() {
        let source = r#"
for (var i = 0; i < 2; i = i + 1) {
  for (var j = 0; j < 5; j = j + 1) {
    if (j == 1) break;
    print i * 10 + j;
  }
}
"#;

        assert_eq!(output_of(source), "0\n10\n");
    }

    #[test]
    fn return_unwinds_nested_loops() {
        assert_eq!(
            output_of("fun f() { while (true) { for (;;) { return \"out\"; } } } print f();"),
            "out\n"
        );
    }

    #[test]
    fn lambda_body_closed_on_the_same_line() {
        let source = "var a = 1\nvar f = fun() { return a }\nprint f()\n";

        assert_eq!(output_of(source), "1\n");
    }

    #[test]
    fn statements_separated_by_newlines() {
        let source = "var total = 0\nfor (var i = 1; i <= 4; i = i + 1)\n  total += i\nprint total\n";

        assert_eq!(output_of(source), "10\n");
    }

    #[test]
    fn inheritance_and_super() {
        let source = r#"
class A { name() { return "A"; } }
class B < A { name() { return super.name() + "B"; } }
print B().name();
"#;

        assert_eq!(output_of(source), "AB\n");
        assert_eq!(
            output_of("class A { hi() { return \"hi\"; } } class B < A {} print B().hi();"),
            "hi\n"
        );
    }

    #[test]
    fn initializers_and_fields() {
        assert_eq!(
            output_of("class P { init(x) { this.x = x; } } var p = P(3); print p.x; print p.init(4).x;"),
            "3\n4\n"
        );
        assert_eq!(
            output_of("class A { m() { return \"method\"; } } var a = A(); a.m = \"field\"; print a.m;"),
            "field\n"
        );
        assert_eq!(
            output_of("class C { init() { this.v = 1; } get() { return this.v; } } var g = C().get; print g();"),
            "1\n"
        );
        assert_eq!(
            first_message("class P { init(x) { this.x = x; } } P();"),
            "Expected 1 arguments but got 0."
        );
    }

    #[test]
    fn property_errors() {
        assert_eq!(first_message("print 1.x;"), "Only instances have properties.");
        assert_eq!(first_message("var a = 1; a.x = 2;"), "Only instances have fields.");
        assert_eq!(first_message("class A {} print A().nope;"), "Undefined property 'nope'.");
        assert_eq!(
            first_message("var NotClass = 1; class B < NotClass {}"),
            "Superclass must be a class."
        );
    }

    #[test]
    fn call_errors() {
        assert_eq!(
            first_message("fun f(a) { return a; } f();"),
            "Expected 1 arguments but got 0."
        );
        assert_eq!(first_message("clock(1);"), "Expected 0 arguments but got 1.");
        assert_eq!(first_message("\"x\"();"), "Can only call functions and classes.");
    }

    #[test]
    fn undefined_globals_fail_at_runtime() {
        assert_eq!(first_message("print y;"), "Undefined variable 'y'.");
        assert_eq!(first_message("y = 1;"), "Undefined variable 'y'.");
        assert_eq!(first_message("var a = a;"), "Undefined variable 'a'.");
    }

    #[test]
    fn value_display() {
        assert_eq!(
            output_of("fun f() { return 1; } print f; print clock; print fun () {}; class A {} print A; print A(); print nil;"),
            "<fn f>\n<native fn clock>\n<fn>\nA\nA instance\nnil\n"
        );
    }

    #[test]
    fn clock_returns_seconds() {
        assert_eq!(output_of("var t = clock(); print t > 1000000000;"), "true\n");
    }

    #[test]
    fn println_and_readln() {
        let source = "var name = readln(\"Name? \"); println(\"Hi \" + name);";
        let (output, result) = run_full(source, &RunConfig::default(), "Ada\n");

        assert!(result.is_ok());
        assert_eq!(output, "Name? Hi Ada\n");

        let (output, result) = run_full("print readln(\"\");", &RunConfig::default(), "");
        assert!(result.is_ok());
        assert_eq!(output, "nil\n");
    }

    #[test]
    fn implicit_result_is_shown_when_nothing_was_printed() {
        assert_eq!(output_of("1 + 2;"), "3\n");
        assert_eq!(output_of("2 * 3\n"), "6\n");
        assert_eq!(output_of("var x = \"hi\";"), "hi\n");
        assert_eq!(output_of("true;"), "true\n");

        assert_eq!(output_of("print 1; 2;"), "1\n");
        assert_eq!(output_of("println(5); 6;"), "5\n");
        assert_eq!(output_of("nil;"), "");
        assert_eq!(output_of("fun f() { return 1; } f;"), "");
    }

    #[test]
    fn implicit_result_includes_conditions() {
        assert_eq!(output_of("var i = 0; while (i < 3) i = i + 1;"), "false\n");
        assert_eq!(output_of("var a = 1; if (a > 2) a = 10;"), "false\n");
        assert_eq!(output_of("var a = 1; if (a < 2) a = 10;"), "10\n");
        assert_eq!(output_of("fun f() { return 7; } f();"), "7\n");
    }

    #[test]
    fn interpret_returns_the_implicit_result() {
        let tokens = scan_tokens("1 + 2;").unwrap();
        let statements = Parser::new(&tokens).parse().unwrap();
        let locals = Resolver::new().resolve(&statements).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let mut interpreter = Interpreter::with_io(&mut out, io::empty());
        interpreter.resolve(locals);

        let result = interpreter.interpret(&statements).unwrap();
        assert!(matches!(result, Some(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn deep_recursion_reports_stack_overflow() {
        let config = RunConfig {
            max_call_depth: 16,
            show_implicit_result: true,
        };

        let (_, result) = run_full("fun r(n) { return r(n + 1); } r(0);", &config, "");
        let error = result.unwrap_err();
        assert_eq!(error.diagnostics()[0].message(), "Stack overflow.");
        assert_eq!(error.exit_code(), 70);

        let (output, result) = run_full(
            "fun down(n) { return n == 0 ? 0 : down(n - 1); } print down(15);",
            &config,
            "",
        );
        assert!(result.is_ok());
        assert_eq!(output, "0\n");
    }

    #[test]
    fn deep_recursion_within_the_default_limit() {
        let source = "fun f(n) { if (n == 0) return 0; return 1 + f(n - 1); } print f(2000);";

        assert_eq!(output_of(source), "2000\n");
    }

    #[test]
    fn recursion_within_the_limit() {
        assert_eq!(
            output_of("fun fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); } print fib(15);"),
            "610\n"
        );
    }

    #[test]
    fn runtime_error_stops_execution() {
        let (output, result) = run_full(
            "print 1;\nprint nil + 1;\nprint 2;",
            &RunConfig::default(),
            "",
        );

        assert_eq!(output, "1\n");
        assert_eq!(
            result.unwrap_err().to_string(),
            "Operands must be two numbers or two strings.\n[line 2:11]"
        );
    }

    #[test]
    fn runtime_error_format() {
        assert_eq!(
            error_of("\n\nprint -nil;").to_string(),
            "Operand must be a number.\n[line 3:7]"
        );
        assert_eq!(error_of("print -nil;").diagnostics()[0].position(), Some((1, 7)));
    }
}
