// Integration Tests for the Fridh Front End
//
// Table-driven tests that run whole modules through `process_module`, plus a
// few structural checks on the resulting tree.

use fridh::{process_module, ExecutableUnit, FridhError, SymbolKind};
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug)]
enum TestResult {
    Pass,
    Fail(String),
    Panic(String),
}

#[derive(Debug, Clone)]
struct TestCase {
    name: String,
    input: String,
    should_succeed: bool,
    expected_error_contains: Option<String>,
}

impl TestCase {
    fn should_succeed(name: &str, input: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: true,
            expected_error_contains: None,
        }
    }

    fn should_fail(name: &str, input: &str) -> Self {
        Self {
            should_succeed: false,
            ..Self::should_succeed(name, input)
        }
    }

    fn should_fail_with_message(name: &str, input: &str, expected: &str) -> Self {
        Self {
            expected_error_contains: Some(expected.to_string()),
            ..Self::should_fail(name, input)
        }
    }

    fn run(&self) -> TestResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| translate(&self.input)));
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<String>()
                    .cloned()
                    .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown panic".to_string());
                return TestResult::Panic(message);
            }
        };

        match (outcome, self.should_succeed) {
            (Ok(_), true) => TestResult::Pass,
            (Ok(_), false) => TestResult::Fail("translated, expected an error".to_string()),
            (Err(error), true) => TestResult::Fail(format!("unexpected error: {}", error)),
            (Err(error), false) => match &self.expected_error_contains {
                Some(expected) if !error.message.contains(expected.as_str()) => {
                    TestResult::Fail(format!("error '{}' lacks '{}'", error.message, expected))
                }
                _ => TestResult::Pass,
            },
        }
    }
}

/// A named group of cases. `run` prints one line per case and returns the
/// number of cases that did not pass.
#[derive(Debug)]
struct TestSuite {
    name: String,
    tests: Vec<TestCase>,
}

impl TestSuite {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    fn run(&self) -> usize {
        println!("{}", self.name);
        let mut failures = 0;
        for test in &self.tests {
            match test.run() {
                TestResult::Pass => println!("  ok    {}", test.name),
                TestResult::Fail(message) => {
                    failures += 1;
                    println!("  FAIL  {}: {}", test.name, message);
                }
                TestResult::Panic(message) => {
                    failures += 1;
                    println!("  PANIC {}: {}", test.name, message);
                }
            }
        }
        println!("  {} of {} passed\n", self.tests.len() - failures, self.tests.len());
        failures
    }
}

fn translate(input: &str) -> Result<fridh::Module, FridhError> {
    process_module(input, "test")
}

// ============================================================================
// Test Suite Creation Functions
// ============================================================================

fn create_malformed_expressions_tests() -> TestSuite {
    let mut suite = TestSuite::new("Malformed Expressions");

    // === PARENTHESES TESTS ===

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_opening_paren",
        "x = (1 + 2",
        "Unmatched opening bracket"
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_opening_paren_nested",
        "x = ((1 + 2)",
        "Unmatched opening bracket"
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_closing_paren",
        "x = 1 + 2)",
        "Unmatched closing bracket"
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "empty_parentheses",
        "()",
        "Empty statement"
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "empty_parentheses_in_expression",
        "x = 1 + ()",
        "Empty statement"
    ));

    // === BRACE TESTS ===

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_opening_brace",
        "x = {1, 2",
        "Unmatched opening curled brace"
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_closing_brace",
        "x = 1 }",
        "Unmatched closing curled brace"
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "mixed_paren_brace_error",
        "x = {1 + (2 * 3}",
        "Unmatched closing curled brace"
    ));

    suite
}

fn create_edge_case_tests() -> TestSuite {
    let mut suite = TestSuite::new("Edge Cases");

    suite.add_test(TestCase::should_succeed("empty_input", ""));
    suite.add_test(TestCase::should_succeed("only_whitespace", "   \n\t  "));
    suite.add_test(TestCase::should_succeed("only_comments", "; nothing\n;; still\nnothing ;;\n"));

    suite.add_test(TestCase::should_fail("unexpected_eof_after_operator", "x = 1 +"));
    suite.add_test(TestCase::should_fail("unexpected_eof_in_expression", "x = 1 + ("));

    let deep_parens = "x = ".to_string() + &"(".repeat(100) + "1" + &")".repeat(100);
    suite.add_test(TestCase::should_succeed("deeply_nested_parens", &deep_parens));

    let too_deep = "x = ".to_string() + &"(".repeat(200) + "1" + &")".repeat(200);
    suite.add_test(TestCase::should_fail_with_message(
        "too_deeply_nested_parens",
        &too_deep,
        "Nesting too deep"
    ));

    let long_sum = format!("function f\n\treturn {}1\n", "1 + ".repeat(5_000));
    suite.add_test(TestCase::should_fail_with_message(
        "long_operator_chain",
        &long_sum,
        "Nesting too deep"
    ));

    let short_sum = format!("function f\n\treturn {}1\n", "1 + ".repeat(100));
    suite.add_test(TestCase::should_succeed("bounded_operator_chain", &short_sum));

    let long_chain = format!("if a\n\tx = 1\n{}", "else if a\n\tx = 1\n".repeat(5_000));
    suite.add_test(TestCase::should_fail_with_message(
        "long_else_if_chain",
        &long_chain,
        "Nesting too deep"
    ));

    let short_chain = format!("if a\n\tx = 1\n{}", "else if a\n\tx = 1\n".repeat(100));
    suite.add_test(TestCase::should_succeed("bounded_else_if_chain", &short_chain));

    suite
}

fn create_operator_tests() -> TestSuite {
    let mut suite = TestSuite::new("Operator Tests");

    // Missing operands
    suite.add_test(TestCase::should_fail_with_message(
        "missing_left_operand",
        "+ 1",
        "binary operator in the beginning"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_right_operand",
        "x = 1 +",
        "An operator is missing an argument"
    ));
    suite.add_test(TestCase::should_fail("missing_both_operands", "+"));

    // Invalid operator combinations
    suite.add_test(TestCase::should_fail_with_message(
        "double_plus",
        "x = 1 ++ 2",
        "two sequential binary operators"
    ));
    // A minus after another operator is a negation
    suite.add_test(TestCase::should_succeed("double_minus", "x = 1 -- 2"));
    suite.add_test(TestCase::should_succeed("mixed_operators", "x = 1 +- 2"));
    suite.add_test(TestCase::should_fail_with_message(
        "unary_after_argument",
        "x = y !",
        "followed by an unary operator"
    ));

    suite.add_test(TestCase::should_succeed("comparison_equal", "x = 1 == 2"));
    suite.add_test(TestCase::should_succeed("comparison_not_equal", "x = 1 != 2"));
    suite.add_test(TestCase::should_succeed("shifts", "x = 1 << 2 >> 1"));
    suite.add_test(TestCase::should_succeed("bitwise", "x = ~a & b | c ^^ d"));
    suite.add_test(TestCase::should_succeed("compound_assignment", "x ^= 2"));

    suite
}

fn create_control_flow_tests() -> TestSuite {
    let mut suite = TestSuite::new("Control Flow Tests");

    // If statements
    suite.add_test(TestCase::should_succeed("valid_if", "if x\n\ty = 1\n"));
    suite.add_test(TestCase::should_succeed("valid_if_else", "if x\n\ty = 1\nelse\n\ty = 2\n"));
    suite.add_test(TestCase::should_succeed("empty_if_body", "if x\ny = 1\n"));
    suite.add_test(TestCase::should_fail_with_message(
        "if_missing_condition",
        "if\n\ty = 1\n",
        "Empty statement"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "stray_else",
        "else\n\ty = 1\n",
        "without a preceding if"
    ));

    // Loops
    suite.add_test(TestCase::should_succeed("valid_while", "while x\n\tx -= 1\n"));
    suite.add_test(TestCase::should_succeed("valid_for", "for i = 0, i < 10, i += 1\n\tprint(i)\n"));
    suite.add_test(TestCase::should_fail_with_message(
        "for_missing_term",
        "for i = 0, i < 10\n\tprint(i)\n",
        "Invalid number of terms"
    ));
    suite.add_test(TestCase::should_succeed("valid_foreach", "foreach x in items\n\tprint(x)\n"));
    suite.add_test(TestCase::should_fail_with_message(
        "foreach_missing_in",
        "foreach x items\n\tprint(x)\n",
        "Malformed foreach statement"
    ));

    // Indentation
    suite.add_test(TestCase::should_succeed("bare_return", "return\n"));
    suite.add_test(TestCase::should_fail_with_message(
        "unexpected_indentation",
        "x = 1\n\ty = 2\n",
        "Unexpected increase in the indentation level"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "mixed_indentation",
        "if x\n\t y = 1\n",
        "indentation"
    ));

    suite
}

fn create_literal_tests() -> TestSuite {
    let mut suite = TestSuite::new("Literal Tests");

    // Valid literals
    suite.add_test(TestCase::should_succeed("integer_literal", "x = 42"));
    suite.add_test(TestCase::should_succeed("double_literal", "x = 3.14"));
    suite.add_test(TestCase::should_succeed("hex_literal", "x = 0xff"));
    suite.add_test(TestCase::should_succeed("string_literal", "x = \"hello\\n\""));
    suite.add_test(TestCase::should_succeed("boolean_true", "x = true"));
    suite.add_test(TestCase::should_succeed("nil_literal", "x = nil"));

    // Invalid number formats
    suite.add_test(TestCase::should_fail_with_message("multiple_dots", "x = 3.14.159", "multiple dots"));
    suite.add_test(TestCase::should_fail_with_message("trailing_dot", "x = 42.", "ending with a dot"));
    suite.add_test(TestCase::should_fail_with_message("empty_hex", "x = 0x", "Incomplete hex number"));
    suite.add_test(TestCase::should_fail_with_message(
        "hex_out_of_range",
        "x = 0x1ffffffffffffffff",
        "out of range"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "integer_out_of_range",
        "x = 99999999999999999999",
        "out of range"
    ));

    // Unterminated strings
    suite.add_test(TestCase::should_fail_with_message(
        "unterminated_string",
        "x = \"hello",
        "Unterminated string"
    ));
    suite.add_test(TestCase::should_fail("unterminated_string_with_newline", "x = \"hello\nworld\""));
    suite.add_test(TestCase::should_fail_with_message("unexpected_character", "x = $", "Unexpected character"));

    suite
}

fn create_comment_tests() -> TestSuite {
    let mut suite = TestSuite::new("Comment Tests");

    suite.add_test(TestCase::should_succeed("line_comment", "x = 1 ; note\n"));
    suite.add_test(TestCase::should_succeed("multi_line_comment", ";; a\nb ;;\nx = 1\n"));
    suite.add_test(TestCase::should_succeed("nested_comment", ";. outer ;. inner .; still .;\nx = 1\n"));
    suite.add_test(TestCase::should_fail_with_message(
        "unterminated_multi_line_comment",
        "x = 1\n;; open\n",
        "Unable to find the end of a multi-line comment"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unbalanced_nested_comment",
        ";. outer ;. inner .;\n",
        "Unable to find the end of a nested comment"
    ));

    suite
}

fn create_function_call_tests() -> TestSuite {
    let mut suite = TestSuite::new("Function Call Tests");

    // Valid function calls
    suite.add_test(TestCase::should_succeed("simple_function_call", "foo()"));
    suite.add_test(TestCase::should_succeed("function_call_with_args", "foo(1, 2, 3)"));
    suite.add_test(TestCase::should_succeed("method_call", "point.move(1, -1)"));
    suite.add_test(TestCase::should_succeed("chained_call", "make()(1)"));

    // Invalid function calls
    suite.add_test(TestCase::should_fail("missing_closing_paren", "foo(1, 2"));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_opening_paren",
        "foo 1, 2)",
        "two arguments without an operator"
    ));
    suite.add_test(TestCase::should_fail_with_message("trailing_comma", "foo(1, 2,)", "Empty statement"));

    suite
}

fn create_declaration_tests() -> TestSuite {
    let mut suite = TestSuite::new("Declaration Tests");

    suite.add_test(TestCase::should_succeed(
        "class_with_method",
        "class Point\n\tfunction move dx dy\n\t\t@x += dx\n\t\t@y += dy\n"
    ));
    suite.add_test(TestCase::should_succeed(
        "sibling_scopes",
        "class A\n\tclass Inner\nclass B\n\tclass Inner\n"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "duplicate_function",
        "function f a b\n\treturn a + b\nfunction f\n\treturn 1\n",
        "Name \"f\" has already been used"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "function_shadowed_by_class",
        "function f\nclass f\n",
        "has already been used"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "statement_in_class",
        "class A\n\tx = 1\n",
        "need to be placed within functions"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "malformed_class",
        "class A B\n",
        "Malformed class declaration"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "literal_argument",
        "function f 1\n",
        "only names are permitted"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "prefixed_argument",
        "function f ::a\n",
        "only names are permitted"
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "member_outside_class",
        "function f\n\treturn @x\n",
        "outside of a class"
    ));

    suite
}

fn create_positive_tests() -> TestSuite {
    let mut suite = TestSuite::new("Positive Tests");

    // These tests verify that valid syntax still translates correctly
    suite.add_test(TestCase::should_succeed("simple_arithmetic", "x = 1 + 2 * 3"));
    suite.add_test(TestCase::should_succeed("parentheses", "x = (1 + 2) * 3"));
    suite.add_test(TestCase::should_succeed("string_concatenation", "x = \"hello\" + \" world\""));
    suite.add_test(TestCase::should_succeed("boolean_operations", "x = true && !false"));
    suite.add_test(TestCase::should_succeed("arrays", "x = {1, {2, 3}, {}}"));
    suite.add_test(TestCase::should_succeed("scope_prefix", "::total = ::total + 1"));
    suite.add_test(TestCase::should_succeed(
        "complex_expression",
        "x = (1 + 2) * 3 + foo(4, 5)"
    ));

    suite
}

// ============================================================================
// Main Test Function
// ============================================================================

#[test]
fn comprehensive_front_end_tests() {
    let suites = vec![
        create_malformed_expressions_tests(),
        create_edge_case_tests(),
        create_operator_tests(),
        create_control_flow_tests(),
        create_literal_tests(),
        create_comment_tests(),
        create_function_call_tests(),
        create_declaration_tests(),
        create_positive_tests(),
    ];

    let failures: usize = suites.iter().map(TestSuite::run).sum();
    assert_eq!(failures, 0, "{} cases failed, see the output above", failures);
}

#[test]
fn add_function_end_to_end() {
    let module = process_module("function add a b\n\treturn a+b\n", "math").unwrap();
    let add = module.resolve("add").unwrap();

    assert_eq!(module.symbols.get(add).kind, SymbolKind::Function);
    assert_eq!(module.symbols.children(module.symbols.root()).count(), 1);

    let function = module.symbols.function(add).unwrap();
    assert_eq!(function.arguments, vec!["a", "b"]);
    assert_eq!(function.body.len(), 1);
    assert!(matches!(function.body[0], ExecutableUnit::Return { line: 2, .. }));
    assert_eq!(function.body[0].to_string(), "return (+ a b)");
}

#[test]
fn module_rendering() {
    let source = "\
class Counter
\tfunction step by
\t\tif by > 0
\t\t\t@count += by
\t\telse
\t\t\treturn nil
counter = Counter()
";
    let module = process_module(source, "counter").unwrap();
    let expected = "\
module counter
  (= counter (call Counter))
  class Counter
    function step by
      if (> by 0)
        (+= @count by)
      else
        return nil
";
    assert_eq!(module.to_string(), expected);
}

#[test]
fn errors_carry_the_detecting_line() {
    let error = process_module("x = 1\ny = 2\nz = (3\n", "lines").unwrap_err();
    assert_eq!(error.line, 3);
    assert_eq!(error.to_string(), "Line 3: Unmatched opening bracket");
}
