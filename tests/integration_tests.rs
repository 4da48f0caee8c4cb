// Program-level integration tests for the Lox interpreter.
//
// Each case runs a whole program through the library pipeline (lexer, parser,
// interpreter) and checks either the printed output or the reported error.

use lox::error::Diagnostics;
use lox::interpreter::Interpreter;
use lox::runner::compile;

/// What a program is expected to do.
#[derive(Debug, Clone)]
pub enum Expected {
    /// Runs cleanly and prints exactly this.
    Output(String),
    /// Reports a lexical or parse error whose text contains this.
    CompileError(String),
    /// Fails at runtime with a message (in `<message>\n[line N]` form)
    /// containing this.
    RuntimeError(String),
}

/// Test result for a single test case
#[derive(Debug)]
pub enum TestResult {
    Pass,
    Fail(String),
    Crash(String),
}

/// Individual test case
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub expected: Expected,
}

impl TestCase {
    pub fn prints(name: &str, input: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            expected: Expected::Output(output.to_string()),
        }
    }

    pub fn compile_error(name: &str, input: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            expected: Expected::CompileError(message.to_string()),
        }
    }

    pub fn runtime_error(name: &str, input: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            expected: Expected::RuntimeError(message.to_string()),
        }
    }
}

/// Test suite containing multiple test cases
#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Run all tests in this suite
    pub fn run(&self) -> TestSuiteResults {
        let mut results = TestSuiteResults::new(&self.name);

        println!("Running test suite: {}", self.name);
        println!("{}", "=".repeat(50));

        for test in &self.tests {
            let result = run_single_test(test);
            results.add_result(&test.name, result);
        }

        results.print_summary();
        results
    }
}

/// Results for a test suite run
#[derive(Debug)]
pub struct TestSuiteResults {
    pub suite_name: String,
    pub failures: Vec<String>,
    pub passed: usize,
}

impl TestSuiteResults {
    pub fn new(suite_name: &str) -> Self {
        Self {
            suite_name: suite_name.to_string(),
            failures: Vec::new(),
            passed: 0,
        }
    }

    pub fn add_result(&mut self, test_name: &str, result: TestResult) {
        match result {
            TestResult::Pass => {
                self.passed += 1;
                println!("  ok   {}", test_name);
            }
            TestResult::Fail(msg) => {
                println!("  FAIL {}: {}", test_name, msg);
                self.failures.push(format!("{}::{}: {}", self.suite_name, test_name, msg));
            }
            TestResult::Crash(msg) => {
                println!("  CRASH {}: {}", test_name, msg);
                self.failures
                    .push(format!("{}::{}: crashed: {}", self.suite_name, test_name, msg));
            }
        }
    }

    pub fn print_summary(&self) {
        println!(
            "{}: {} passed, {} failed",
            self.suite_name,
            self.passed,
            self.failures.len()
        );
        println!();
    }
}

/// Everything one program run produced.
struct ProgramRun {
    diagnostics: Vec<String>,
    output: String,
    runtime_error: Option<String>,
}

fn run_program(input: &str) -> ProgramRun {
    let mut diagnostics = Diagnostics::new();
    let statements = compile(input, &mut diagnostics);

    let mut interpreter = Interpreter::with_output(Vec::new());
    let runtime_error = interpreter.interpret(&statements).err().map(|e| e.plain());
    let output = String::from_utf8_lossy(&interpreter.into_output()).into_owned();

    ProgramRun {
        diagnostics: diagnostics.errors().iter().map(|d| d.to_string()).collect(),
        output,
        runtime_error,
    }
}

/// Run a single test case
fn run_single_test(test: &TestCase) -> TestResult {
    // Catch any panics to detect crashes
    let result = std::panic::catch_unwind(|| run_program(&test.input));

    let run = match result {
        Ok(run) => run,
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            return TestResult::Crash(panic_msg);
        }
    };

    match &test.expected {
        Expected::Output(expected) => {
            if !run.diagnostics.is_empty() {
                TestResult::Fail(format!("unexpected diagnostics: {:?}", run.diagnostics))
            } else if let Some(error) = run.runtime_error {
                TestResult::Fail(format!("unexpected runtime error: {}", error))
            } else if &run.output != expected {
                TestResult::Fail(format!("expected {:?}, got {:?}", expected, run.output))
            } else {
                TestResult::Pass
            }
        }
        Expected::CompileError(expected) => {
            if run.diagnostics.iter().any(|d| d.contains(expected.as_str())) {
                TestResult::Pass
            } else {
                TestResult::Fail(format!(
                    "no diagnostic contains {:?}; got {:?}",
                    expected, run.diagnostics
                ))
            }
        }
        Expected::RuntimeError(expected) => match run.runtime_error {
            Some(error) if error.contains(expected.as_str()) => TestResult::Pass,
            Some(error) => TestResult::Fail(format!(
                "runtime error {:?} does not contain {:?}",
                error, expected
            )),
            None => TestResult::Fail("expected a runtime error".to_string()),
        },
    }
}

// ============================================================================
// Test Suite Creation Functions
// ============================================================================

fn create_arithmetic_tests() -> TestSuite {
    let mut suite = TestSuite::new("Arithmetic");

    suite.add_test(TestCase::prints("integer_literal", "print 4;", "4\n"));
    suite.add_test(TestCase::prints("float_without_fraction", "print 4.0;", "4\n"));
    suite.add_test(TestCase::prints("float_literal", "print 2.5;", "2.5\n"));
    suite.add_test(TestCase::prints("addition", "print 1 + 2;", "3\n"));
    suite.add_test(TestCase::prints("precedence", "print 2 + 3 * 4;", "14\n"));
    suite.add_test(TestCase::prints("grouping", "print (2 + 3) * 4;", "20\n"));
    suite.add_test(TestCase::prints("left_associative_minus", "print 10 - 4 - 3;", "3\n"));
    suite.add_test(TestCase::prints("left_associative_divide", "print 8 / 4 / 2;", "1\n"));
    suite.add_test(TestCase::prints("fractional_division", "print 7 / 2;", "3.5\n"));
    suite.add_test(TestCase::prints("exact_division", "print 6 / 3;", "2\n"));
    suite.add_test(TestCase::prints("float_sum_normalizes", "print 1.5 + 1.5;", "3\n"));
    suite.add_test(TestCase::prints("mixed_operands", "print 2 * 1.25;", "2.5\n"));
    suite.add_test(TestCase::prints("negation", "print -(-3);", "3\n"));
    suite.add_test(TestCase::prints("negated_float", "print -2.5;", "-2.5\n"));
    suite.add_test(TestCase::prints(
        "overflow_falls_back_to_float",
        "print 9223372036854775807 + 1;",
        "9223372036854775808\n",
    ));

    suite
}

fn create_division_by_zero_tests() -> TestSuite {
    let mut suite = TestSuite::new("Division By Zero");

    suite.add_test(TestCase::prints("positive", "print 1 / 0;", "inf\n"));
    suite.add_test(TestCase::prints("negative", "print -1 / 0;", "-inf\n"));
    suite.add_test(TestCase::prints("zero_by_zero", "print 0 / 0;", "nan\n"));
    suite.add_test(TestCase::prints("float_zero", "print 2.5 / 0.0;", "inf\n"));
    suite.add_test(TestCase::prints("nan_is_not_equal", "print 0 / 0 == 0 / 0;", "false\n"));

    suite
}

fn create_truthiness_and_equality_tests() -> TestSuite {
    let mut suite = TestSuite::new("Truthiness And Equality");

    suite.add_test(TestCase::prints("not_false", "print !false;", "true\n"));
    suite.add_test(TestCase::prints("zero_is_truthy", "print !0;", "false\n"));
    suite.add_test(TestCase::prints("empty_string_is_truthy", "print !\"\";", "false\n"));
    suite.add_test(TestCase::prints("null_is_falsy", "print !null;", "true\n"));
    suite.add_test(TestCase::prints("null_equals_null", "print null == null;", "true\n"));
    suite.add_test(TestCase::prints("int_equals_float", "print 1 == 1.0;", "true\n"));
    suite.add_test(TestCase::prints("string_vs_number", "print \"1\" == 1;", "false\n"));
    suite.add_test(TestCase::prints("bool_vs_number", "print true == 1;", "false\n"));
    suite.add_test(TestCase::prints("null_vs_false", "print null == false;", "false\n"));
    suite.add_test(TestCase::prints("not_equal", "print \"a\" != \"b\";", "true\n"));
    suite.add_test(TestCase::prints("comparison", "print 3 > 2;", "true\n"));
    suite.add_test(TestCase::prints("mixed_comparison", "print 2.5 <= 2;", "false\n"));
    suite.add_test(TestCase::prints(
        "int_float_equality_is_exact",
        "print 9007199254740993 == 9007199254740992.0;",
        "false\n",
    ));
    suite.add_test(TestCase::prints(
        "comparison_chain",
        "print 1 < 2 == 3 < 4;",
        "true\n",
    ));

    suite
}

fn create_string_tests() -> TestSuite {
    let mut suite = TestSuite::new("Strings");

    suite.add_test(TestCase::prints("concatenation", "print \"a\" + \"b\";", "ab\n"));
    suite.add_test(TestCase::prints("single_quotes", "print 'it' + \"'s\";", "it's\n"));
    suite.add_test(TestCase::prints("multiline", "print \"a\nb\";", "a\nb\n"));
    suite.add_test(TestCase::prints("null_renders", "print null;", "null\n"));
    suite.add_test(TestCase::prints("bool_renders", "print true;", "true\n"));

    suite
}

fn create_statement_tests() -> TestSuite {
    let mut suite = TestSuite::new("Statements");

    suite.add_test(TestCase::prints(
        "several_prints",
        "print 1;\nprint 2;\nprint 3;",
        "1\n2\n3\n",
    ));
    suite.add_test(TestCase::prints("expression_statement_is_silent", "1 + 2;", ""));
    suite.add_test(TestCase::prints(
        "comments_are_ignored",
        "# heading\nprint 1; # trailing\n#last",
        "1\n",
    ));
    suite.add_test(TestCase::prints("empty_program", "", ""));

    suite
}

fn create_error_tests() -> TestSuite {
    let mut suite = TestSuite::new("Errors");

    suite.add_test(TestCase::runtime_error(
        "string_plus_number",
        "print \"a\" + 1;",
        "Operands must be two numbers or two strings.\n[line 1]",
    ));
    suite.add_test(TestCase::runtime_error(
        "compare_strings",
        "print \"a\" < \"b\";",
        "Operands must be numbers.",
    ));
    suite.add_test(TestCase::runtime_error(
        "negate_string",
        "print -\"a\";",
        "Operand must be a number.",
    ));
    suite.add_test(TestCase::runtime_error(
        "reports_line",
        "print 1;\n\nprint true * 2;",
        "[line 3]",
    ));
    suite.add_test(TestCase::compile_error(
        "missing_operand",
        "print 1 +;",
        "[line 1] Error at ';': Expect expression.",
    ));
    suite.add_test(TestCase::compile_error(
        "missing_semicolon_at_end",
        "print 1",
        "[line 1] Error at end: Expect ';' after value.",
    ));
    suite.add_test(TestCase::compile_error(
        "unclosed_group",
        "print (1 + 2;",
        "Error at ';': Expect ')' after expression.",
    ));
    suite.add_test(TestCase::compile_error(
        "identifiers_are_not_expressions",
        "print x;",
        "Error at 'x': Expect expression.",
    ));
    suite.add_test(TestCase::compile_error(
        "unterminated_string",
        "print \"abc",
        "[line 1] Error: Unterminated string.",
    ));
    suite.add_test(TestCase::compile_error(
        "unexpected_character",
        "print 1 @ 2;",
        "Unexpected character '@'.",
    ));
    suite.add_test(TestCase::compile_error(
        "trailing_dot",
        "print 1.;",
        "Invalid number literal.",
    ));
    suite.add_test(TestCase::compile_error(
        "two_dots",
        "print 1.5.2;",
        "[line 1] Error: Invalid number literal.",
    ));

    suite
}

// ============================================================================
// Main Test Function
// ============================================================================

#[test]
fn comprehensive_program_tests() {
    let suites = vec![
        create_arithmetic_tests(),
        create_division_by_zero_tests(),
        create_truthiness_and_equality_tests(),
        create_string_tests(),
        create_statement_tests(),
        create_error_tests(),
    ];

    let mut failures = Vec::new();
    for suite in suites {
        let results = suite.run();
        failures.extend(results.failures);
    }

    assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n"));
}
