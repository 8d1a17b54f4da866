mod common;

#[cfg(test)]
mod driver_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::interpreter::DEFAULT_MAX_CALL_DEPTH;
    use lox::{RunConfig, RunError};

    use crate::common::{error_of, run_capture, run_full};

    #[test]
    fn lexical_errors_exit_65() {
        let error = error_of("print @;\nprint #;");

        assert!(matches!(error, RunError::Static(_)));
        assert_eq!(error.exit_code(), 65);
        assert_eq!(
            error.to_string(),
            "[line 1:7] Error: Unexpected character: @\n[line 2:7] Error: Unexpected character: #"
        );
    }

    #[test]
    fn syntax_errors_are_all_reported() {
        let error = error_of("var = 1;\nprint ;");

        assert_eq!(error.exit_code(), 65);
        assert_eq!(error.diagnostics().len(), 2);
        assert_eq!(
            error.to_string(),
            "[line 1:5] Error at '=': Expect variable name.\n[line 2:7] Error at ';': Expect expression."
        );
    }

    #[test]
    fn nothing_runs_when_a_static_phase_fails() {
        let (output, result) = run_capture("print 1;\nreturn 2;");
        assert_eq!(output, "");
        assert_eq!(result.unwrap_err().exit_code(), 65);

        let (output, result) = run_capture("print 1;\nvar = 2;");
        assert_eq!(output, "");
        assert_eq!(result.unwrap_err().exit_code(), 65);
    }

    #[test]
    fn runtime_errors_exit_70_after_earlier_output() {
        let (output, result) = run_capture("print \"before\";\nprint -\"x\";\nprint \"after\";");
        let error = result.unwrap_err();

        assert_eq!(output, "before\n");
        assert!(matches!(error, RunError::Runtime(_)));
        assert_eq!(error.exit_code(), 70);
        assert_eq!(error.diagnostics()[0].position(), Some((2, 7)));
    }

    #[test]
    fn quiet_suppresses_the_implicit_result() {
        let quiet = RunConfig::from_args(None, true);
        let (output, result) = run_full("1 + 2;", &quiet, "");

        assert!(result.is_ok());
        assert_eq!(output, "");

        let (output, _) = run_full("1 + 2;", &RunConfig::from_args(None, false), "");
        assert_eq!(output, "3\n");
    }

    #[test]
    fn config_from_args() {
        assert_eq!(RunConfig::from_args(None, false), RunConfig::default());
        assert_eq!(RunConfig::default().max_call_depth, DEFAULT_MAX_CALL_DEPTH);

        let config = RunConfig::from_args(Some(10), true);
        assert_eq!(config.max_call_depth, 10);
        assert!(!config.show_implicit_result);
    }

    #[test]
    fn call_depth_comes_from_config() {
        let source = "fun down(n) { return n == 0 ? 0 : down(n - 1); } print down(8);";

        let (output, result) = run_full(source, &RunConfig::from_args(Some(9), false), "");
        assert!(result.is_ok());
        assert_eq!(output, "0\n");

        let (_, result) = run_full(source, &RunConfig::from_args(Some(8), false), "");
        assert_eq!(result.unwrap_err().to_string(), "Stack overflow.\n[line 1:45]");
    }
}
