use std::{fs, io::Cursor, sync::atomic::Ordering};

use bloc::{
    error::{ParseError, RuntimeError, ScriptError},
    interpreter::{evaluator::core::Context, value::core::Value},
    run,
};
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_bloc_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = run(&code, &mut Context::new()) {
                panic!("Example {} in {:?} failed:\n{}\nError: {:?}", i + 1, path, code, e);
            }
        }
    }

    assert!(count > 0, "No examples found in book/src");
}

fn extract_bloc_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```bloc") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn assert_success(src: &str) {
    if let Err(e) = run(src, &mut Context::new()) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) -> ScriptError {
    match run(src, &mut Context::new()) {
        Ok(_) => panic!("Script succeeded but was expected to fail:\n{src}"),
        Err(e) => e,
    }
}

fn result_of(src: &str) -> Value {
    run(src, &mut Context::new()).unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"))
                                 .unwrap_or_else(|| panic!("Script has no result:\n{src}"))
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_success("let x = 1 + 2\nassert(x == 3)");
    assert_success("let x = 7 * 9\nassert(x == 63)");
    assert_success("let x = 8 - 5\nassert(x == 3)");
    assert_success("let x = 10 / 4\nassert(x == 2)");
    assert_success("let x = 10.0 / 4\nassert(x == 2.5)");
}

#[test]
fn compound_assignments() {
    assert_success("let x = 2\nx += 3\nassert(x == 5)");
    assert_success("let x = 7\nx -= 2\nassert(x == 5)");
    assert_success("let x = 4\nx *= 2\nassert(x == 8)");
    assert_success("let x = 9\nx /= 3\nassert(x == 3)");
    assert_success("let x = 9\nx %= 4\nassert(x == 1)");
    assert_success("let s = \"ab\"\ns += \"cd\"\nassert(s == \"abcd\")");
}

#[test]
fn assignment_converts_into_the_declared_type() {
    assert_success("let n = 1\nn = 7.9\nassert(n == 7)");
    assert_success("let x = 1.5\nx = 2\nassert(typeof(x) == \"numeric\")");
    assert_success("let v = null\nv = 3\nassert(typeof(v) == \"integer\")");
}

#[test]
fn division_truncates_and_remainder_follows_the_dividend() {
    assert_success("assert(-7 / 2 == -3)\nassert(-7 % 2 == -1)\nassert(7 % -2 == 1)");
    assert_success("let a = -17\nlet b = 5\nassert((a / b) * b + a % b == a)");
}

#[test]
fn exponentiation() {
    assert_success("assert(2 ** 10 == 1024)");
    assert_success("assert(2 ** -1 == 0.5)");
    assert_success("assert(2 ** 3 ** 2 == 512)");
    assert_success("assert(re(3i * 3i) == -9.0)");
}

#[test]
fn string_and_byte_concatenation() {
    assert_success("assert(\"n=\" + 5 == \"n=5\")");
    assert_success("assert(1.5 + \"x\" == \"1.5x\")");
    assert_success("let b = bytes(\"ab\") + \"c\"\nassert(b.count() == 3)\nassert(b.at(2) == 'c')");
}

#[test]
fn comparisons_and_logic() {
    assert_success("assert(2 < 3)\nassert(3 >= 3)\nassert(2 != 3)\nassert(1 == 1.0)");
    assert_success("assert(\"apple\" < \"pear\")\nassert(false < true)");
    assert_success("assert(true and not false)\nassert(true xor false)\nassert(not (true xor true))");
    assert_success("assert((6 & 3) == 2)\nassert((6 | 3) == 7)\nassert((6 ^ 3) == 5)\nassert(~0 == -1)");
    assert_success("assert(1 << 4 == 16)\nassert(-16 >> 2 == -4)");
}

#[test]
fn null_semantics() {
    assert_success("let n = null\nassert(isnull(n))");
    assert_success("assert(not (null == 1))\nassert(not (null < 1))");
    assert_success("assert(null == null)\nassert(not (null != null))");
    assert_success("assert(isnull(1 + null))\nassert(isnull(int(null)))");
    assert_success("let hit = false\nif null do { hit = true }\nassert(not hit)");
}

#[test]
fn three_valued_logic() {
    let table = "let n = bool(null)\n\
                 assert(not isnull(n and false))\nassert(not (n and false))\n\
                 assert(isnull(n and true))\n\
                 assert(n or true)\n\
                 assert(isnull(n or false))\n\
                 assert(isnull(n and n))";
    assert_success(table);

    assert_success("assert(not (false and (1 / 0 == 1)))\nassert(true or (1 / 0 == 1))");
    assert!(matches!(assert_failure("let n = bool(null)\nn and (1 / 0 == 1)"),
                     ScriptError::Runtime(RuntimeError::DivideByZero { .. })));
}

#[test]
fn structural_scenarios() {
    assert_success("let t = tup(\"abcd\", 1234, 0.123)\nt.set@2(4.56)\nassert(t@2 == 4)");
    assert_success("assert(hex(255, 0) == \"ff\")\nassert(hex(255, 4) == \"00ff\")");
    assert_success("let s = \"abcdef\"\ns.put(3, 65)\nassert(s == \"abcAef\")");
    assert_success("let a = [1, 5]\na.insert(1, [2, 3, 4])\nassert(a == [1, 2, 3, 4, 5])");
}

#[test]
fn regex_match_is_anchored() {
    assert_success("assert(\"abc123\" ~= \"[a-z]+[0-9]+\")");
    assert_success("assert(not (\"abc123x\" ~= \"[a-z]+[0-9]+\"))");
    assert!(matches!(assert_failure("\"a\" ~= \"(\""),
                     ScriptError::Runtime(RuntimeError::Regex { .. })));
}

#[test]
fn if_else_chains() {
    let src = "let x = 5\nlet r = \"\"\nif x < 3 do { r = \"low\" } else if x < 10 do { r = \"mid\" } \
               else do { r = \"high\" }\nr";
    assert_eq!(result_of(src), Value::from("mid"));
}

#[test]
fn loops() {
    assert_success("let sum = 0\nfor x in 1..5 do { sum += x }\nassert(sum == 10)");
    assert_success("let sum = 0\nfor x in 1..=5 do { sum += x }\nassert(sum == 15)");
    assert_success("let arr = [2, 3, 4]\nlet sum = 0\nfor x in arr do { sum += x }\nassert(sum == 9)");
    assert_success("let i = 0\nwhile i < 10 do { i += 3 }\nassert(i == 12)");
}

#[test]
fn loop_source_is_a_snapshot() {
    let src = "let a = [1, 2]\nlet n = 0\nfor x in a do { a.append(x)\nn += 1 }\nn";
    assert_eq!(result_of(src), Value::Integer(2));
}

#[test]
fn blocks_open_scopes() {
    assert_success("let x = 1\nif true do { let x = 2\nassert(x == 2) }\nassert(x == 1)");
    assert!(matches!(assert_failure("if true do { let y = 2 }\ny"),
                     ScriptError::Parse(ParseError::UnknownVariable { .. })));
}

#[test]
fn string_member_calls() {
    assert_success("let s = \"abcdef\"\ns.insert(3, 'A')\nassert(s == \"abcAdef\")");
    assert_success("let s = \"abcdef\"\ns.put(3, 'A')\nassert(s == \"abcAef\")");
    assert_success("let s = \"abc\"\ns.delete(0)\ns.append(\"de\")\nassert(s == \"bcde\")");
    assert_success("let s = \"abc\"\nassert(s.count() == 3)\nassert(s.at(1) == 'b')");
    assert_success("assert(\"xy\".insert(2, \"z\") == \"xyz\")");
}

#[test]
fn collection_member_calls() {
    assert_success("let a = [1, 2, 3]\na.append(4)\nassert(a.count() == 4)");
    assert_success("let a = [1, 2, 3]\na.insert(0, [7, 8])\nassert(a[1] == 8)\nassert(a.count() == 5)");
    assert_success("let a = [1, 2]\na.insert(1, a)\nassert(a.count() == 4)\nassert(a[1] == 1)");
    assert_success("let a = [1.5, 2]\na.put(1, 9)\nassert(a.at(1) == 9.0)\na.delete(0)\nassert(a.count() == 1)");
}

#[test]
fn tuples() {
    assert_success("let t = tup(1, \"a\")\nassert(t@2 == \"a\")\nassert(t.count() == 2)");
    assert_success("let t = tup(1, \"a\")\nt.set@1(2.9)\nassert(t@1 == 2)");
    assert_success("let t = tup(1, 2)\nassert(t == tup(1, 2))\nassert(t != tup(2, 1))");
}

#[test]
fn bounds_errors() {
    assert!(matches!(assert_failure("let s = \"abc\"\ns.insert(4, 'x')"),
                     ScriptError::Runtime(RuntimeError::IndexRange { index: 4, size: 3, .. })));
    assert!(matches!(assert_failure("let a = [1]\na[1]"),
                     ScriptError::Runtime(RuntimeError::IndexRange { .. })));
    assert!(matches!(assert_failure("let a = [1]\na.delete(-1)"),
                     ScriptError::Runtime(RuntimeError::IndexRange { .. })));
    assert!(matches!(assert_failure("let s = \"abc\"\ns.put(0, 300)"),
                     ScriptError::Runtime(RuntimeError::OutOfRange { .. })));
}

#[test]
fn null_receiver_is_a_null_pointer() {
    assert!(matches!(assert_failure("let s = str(null)\ns.append(\"x\")"),
                     ScriptError::Runtime(RuntimeError::NullPointer { .. })));
}

#[test]
fn try_catch() {
    let src = "let caught = \"\"\ntry do { let x = 1 / 0 } catch divide_by_zero do { caught = error }\ncaught";
    let Value::Literal(message) = result_of(src) else {
        panic!("expected a literal");
    };
    assert!(message.contains("Division by zero"));

    assert_success("let who = \"\"\ntry do { raise oops } catch other do { who = \"other\" } \
                    catch oops do { who = \"oops\" }\nassert(who == \"oops\")");
    assert_success("let ok = false\ntry do { [1][5] } catch others do { ok = true }\nassert(ok)");
    assert!(matches!(assert_failure("try do { raise oops } catch other do { }"),
                     ScriptError::Runtime(RuntimeError::Raised { .. })));
}

#[test]
fn uncaught_raise_carries_its_name() {
    match assert_failure("raise boom") {
        ScriptError::Runtime(e) => {
            assert_eq!(e.exception_name(), "boom");
            assert!(e.is_catchable());
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn static_errors_prevent_any_effect() {
    let mut ctx = Context::new();
    let err = run("let x = 1\nx = \"a\"", &mut ctx).unwrap_err();
    assert!(matches!(err, ScriptError::Parse(ParseError::TypeMismatch { .. })));
    assert!(ctx.lookup("x", 1).is_err());
}

#[test]
fn static_errors() {
    assert!(matches!(assert_failure("\"a\" - 1"),
                     ScriptError::Parse(ParseError::InvalidExpression { .. })));
    assert!(matches!(assert_failure("hex(1, 2, 3)"),
                     ScriptError::Parse(ParseError::ArgumentCount { .. })));
    assert!(matches!(assert_failure("sqrt(\"4\")"),
                     ScriptError::Parse(ParseError::ArgumentType { .. })));
    assert!(matches!(assert_failure("let print = 1"),
                     ScriptError::Parse(ParseError::IdentifierReserved { .. })));
    assert!(matches!(assert_failure("foo(1)"),
                     ScriptError::Parse(ParseError::UnknownFunction { .. })));
    assert!(matches!(assert_failure("[1, 2].nope()"),
                     ScriptError::Parse(ParseError::UnknownMethod { .. })));
    assert!(matches!(assert_failure("let x = (1 + 2"), ScriptError::Parse(_)));
    assert!(matches!(assert_failure("min(1, \"a\")"),
                     ScriptError::Parse(ParseError::TypeMismatch { .. })));
    assert!(matches!(assert_failure("max(\"a\", 2.5, \"b\")"),
                     ScriptError::Parse(ParseError::TypeMismatch { .. })));
    assert_success("assert(min(1, 2.5) == 1.0)\nassert(max(\"a\", \"b\") == \"b\")");
}

#[test]
fn integer_limits() {
    assert_eq!(result_of("-9223372036854775807 - 1"), Value::Integer(i64::MIN));
    assert_eq!(result_of("9223372036854775807"), Value::Integer(i64::MAX));
    assert!(matches!(assert_failure("-9223372036854775808"), ScriptError::Parse(_)));
    assert!(matches!(assert_failure("0x10000000000000000"), ScriptError::Parse(_)));
}

#[test]
fn numeric_zero_divisors_are_errors() {
    for src in ["1.0 / 0.0", "5 % 0.0", "1 / 0.0", "1.5 % 0", "-2.0 / 0"] {
        match assert_failure(src) {
            ScriptError::Runtime(RuntimeError::DivideByZero { .. }) => {},
            other => panic!("{src}: expected divide_by_zero, got {other:?}"),
        }
    }
    let src = "let caught = false\ntry do { 1.0 / 0.0 } catch divide_by_zero do { caught = true }\ncaught";
    assert_eq!(result_of(src), Value::Boolean(true));
}

#[test]
fn runtime_errors_have_codes_and_lines() {
    match assert_failure("let a = 1\n\nlet b = a / 0") {
        ScriptError::Runtime(e) => {
            assert_eq!(e.exception_name(), "divide_by_zero");
            assert!(e.to_string().contains("line 3"));
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn state_survives_between_runs() {
    let mut ctx = Context::new();
    run("let total = 1", &mut ctx).unwrap();
    run("total += 41", &mut ctx).unwrap();
    assert_eq!(run("total", &mut ctx).unwrap(), Some(Value::Integer(42)));
}

#[test]
fn input_reads_lines_until_end() {
    let mut ctx = Context::new().with_input(Cursor::new("first\nsecond\n"));
    let src = "let line = \"\"\nlet seen = \"\"\nwhile input(line) do { seen += line + \";\" }\nseen";
    assert_eq!(run(src, &mut ctx).unwrap(), Some(Value::from("first;second;")));
}

#[test]
fn stop_flag_interrupts_loops_and_is_not_catchable() {
    let mut ctx = Context::new();
    ctx.stop_flag().store(true, Ordering::Relaxed);
    let err = run("try do { while true do { } } catch others do { }", &mut ctx).unwrap_err();
    assert!(matches!(err, ScriptError::Runtime(RuntimeError::Interrupted { .. })));
}

#[test]
fn test_script_file() {
    let script = fs::read_to_string("tests/example.bloc").expect("missing file");
    assert_success(&script);
}
