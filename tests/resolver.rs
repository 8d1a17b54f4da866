#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::ast::ExprId;
    use lox::parser::Parser;
    use lox::resolver::{Locals, Resolver};
    use lox::scanner::scan_tokens;

    fn resolve(source: &str) -> Result<Locals, Vec<String>> {
        let tokens = scan_tokens(source).expect("source scans");
        let statements = Parser::new(&tokens).parse().expect("source parses");

        Resolver::new()
            .resolve(&statements)
            .map_err(|errors| errors.iter().map(|e| e.to_string()).collect())
    }

    fn errors(source: &str) -> Vec<String> {
        match resolve(source) {
            Ok(_) => panic!("expected resolve errors for {:?}", source),
            Err(errors) => errors,
        }
    }

    #[test]
    fn records_distance_to_declaring_scope() {
        let locals = resolve("{ var a = 1; { print a; } }").unwrap();

        assert_eq!(locals.len(), 1);
        assert_eq!(locals.get(&ExprId(0)), Some(&1));
    }

    #[test]
    fn globals_get_no_entry() {
        let locals = resolve("var g = 1; { print g; }").unwrap();

        assert!(locals.is_empty());
    }

    #[test]
    fn own_initializer_read_is_an_error_only_for_locals() {
        assert_eq!(
            errors("{ var a = a; }"),
            vec![
                "[line 1:11] Error at 'a': Cannot read local variable in its own initializer.",
                "[line 1:7] Error at 'a': Local variable is not used.",
            ]
        );

        assert!(resolve("var a = a;").is_ok());
    }

    #[test]
    fn duplicate_declaration_in_one_scope() {
        assert_eq!(
            errors("{ var a = 1; var a = 2; print a; }"),
            vec!["[line 1:18] Error at 'a': Variable with this name already declared in this scope."]
        );

        // Shadowing across scopes is fine.
        assert!(resolve("{ var a = 1; { var a = 2; print a; } print a; }").is_ok());
    }

    #[test]
    fn unused_locals_reported_in_source_order() {
        assert_eq!(
            errors("{ var b = 1; var a = 2; }"),
            vec![
                "[line 1:7] Error at 'b': Local variable is not used.",
                "[line 1:18] Error at 'a': Local variable is not used.",
            ]
        );
    }

    #[test]
    fn compound_assignment_counts_as_a_read() {
        assert!(resolve("{ var a = 1; a += 1; }").is_ok());
        assert!(resolve("{ var a = 1; a++; }").is_ok());

        assert_eq!(
            errors("{ var a = 1; a = 2; }"),
            vec!["[line 1:7] Error at 'a': Local variable is not used."]
        );
    }

    #[test]
    fn unused_parameter_is_reported() {
        assert_eq!(
            errors("fun f(a) { return 1; }"),
            vec!["[line 1:7] Error at 'a': Local variable is not used."]
        );
    }

    #[test]
    fn implicit_this_and_super_are_never_unused() {
        assert!(resolve("class A { m() { return 1; } } class B < A { n() { return 2; } }").is_ok());
    }

    #[test]
    fn misplaced_return() {
        assert_eq!(
            errors("return 1;"),
            vec!["[line 1:1] Error at 'return': Cannot return from top-level code."]
        );
        assert_eq!(
            errors("class A { init() { return 1; } }"),
            vec!["[line 1:20] Error at 'return': Cannot return a value from an initializer."]
        );
        assert!(resolve("class A { init() { return; } }").is_ok());
    }

    #[test]
    fn misplaced_this_and_super() {
        assert_eq!(
            errors("print this;"),
            vec!["[line 1:7] Error at 'this': Cannot use 'this' outside of a class."]
        );
        assert_eq!(
            errors("super.x;"),
            vec!["[line 1:1] Error at 'super': Cannot use 'super' outside of a class."]
        );
        assert_eq!(
            errors("class A { f() { return super.f(); } }"),
            vec!["[line 1:24] Error at 'super': Cannot use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn class_cannot_inherit_from_itself() {
        assert_eq!(
            errors("class A < A {}"),
            vec!["[line 1:11] Error at 'A': A class cannot inherit from itself."]
        );
    }

    #[test]
    fn break_and_continue_need_an_enclosing_loop() {
        assert_eq!(
            errors("break;"),
            vec!["[line 1:1] Error at 'break': Cannot use 'break' outside of a loop."]
        );

        // A function body does not inherit the loop around its declaration.
        assert_eq!(
            errors("while (true) { fun f() { continue; } f(); }"),
            vec!["[line 1:26] Error at 'continue': Cannot use 'continue' outside of a loop."]
        );

        assert!(resolve("for (;;) { if (true) break; else continue; }").is_ok());
    }
}
