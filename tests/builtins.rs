use bloc::{
    config::Config,
    error::{RuntimeError, ScriptError},
    interpreter::{evaluator::core::Context, value::core::Value},
    run,
};

fn assert_success(src: &str) {
    if let Err(e) = run(src, &mut Context::new()) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn runtime_error(src: &str) -> RuntimeError {
    match run(src, &mut Context::new()) {
        Err(ScriptError::Runtime(e)) => e,
        other => panic!("expected a runtime error from {src:?}, got {other:?}"),
    }
}

#[test]
fn hex_formatting() {
    assert_success("assert(hex(255) == \"ff\")\nassert(hex(255, 4) == \"00ff\")\nassert(hex(0) == \"0\")");
    assert_success("assert(hex(-1) == \"ffffffffffffffff\")\nassert(hex(1, 40).count() == 16)");
    assert!(matches!(runtime_error("hex(1, -1)"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn hashing() {
    assert_success("assert(hash(\"a\") == 177670)");
    assert_success("let h = hash(\"abc\", 10)\nassert(h >= 0 and h < 10)");
    assert_success("assert(hash(bytes(\"abc\")) == hash(\"abc\"))");
    assert!(matches!(runtime_error("hash(\"a\", 0)"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn base64() {
    assert_success("assert(b64enc(\"Man\") == \"TWFu\")\nassert(b64enc(\"M\") == \"TQ==\")");
    assert_success("assert(str(b64dec(\"TWFu\")) == \"Man\")\nassert(b64dec(\"TWE=\") == bytes(\"Ma\"))");
    assert!(matches!(runtime_error("b64dec(\"T\")"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn string_functions() {
    assert_success("assert(trim(\"  a b \") == \"a b\")\nassert(ltrim(\" a \") == \"a \")\nassert(rtrim(\" a \") == \" a\")");
    assert_success("assert(upper(\"abc\") == \"ABC\")\nassert(lower(\"AbC\") == \"abc\")");
    assert_success("assert(substr(\"abcdef\", 2, 3) == \"cde\")\nassert(substr(\"abcdef\", 4) == \"ef\")");
    assert_success("assert(rsubstr(\"abcdef\", 2) == \"ef\")\nassert(rsubstr(\"ab\", 9) == \"ab\")");
    assert_success("assert(chr(65) == \"A\")\nassert(bytes(3).count() == 3)");
    assert!(matches!(runtime_error("substr(\"abc\", 4)"), RuntimeError::IndexRange { .. }));
    assert!(matches!(runtime_error("chr(0)"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn extremes() {
    assert_success("assert(min(3, 2.5, 7) == 2.5)\nassert(max(3, 9, 7) == 9)");
    assert_success("assert(max(\"pear\", \"apple\") == \"pear\")");
    assert_success("assert(clamp(15, 0, 10) == 10)\nassert(clamp(-3, 0, 10) == 0)");
    assert!(matches!(runtime_error("clamp(1, 5, 0)"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn rounding() {
    assert_success("assert(round(2.5) == 3.0)\nassert(round(3.14159, 2) == 3.14)\nassert(round(7) == 7)");
    assert_success("assert(floor(2.7) == 2.0)\nassert(ceil(2.1) == 3.0)");
}

#[test]
fn roots_logarithms_and_trigonometry() {
    assert_success("assert(sqrt(9) == 3.0)\nassert(sqrt(-4) == imag(0, 2))");
    assert_success("assert(log(1) == 0.0)\nassert(log10(10) == 1.0)\nassert(exp(0) == 1.0)");
    assert_success("assert(sin(0) == 0.0)\nassert(cos(0) == 1.0)\nassert(atan(0) == 0.0)");
    assert!(matches!(runtime_error("log(0)"), RuntimeError::OutOfRange { .. }));
    assert!(matches!(runtime_error("asin(2)"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn imaginary_numbers() {
    assert_success("assert(abs(3 + 4i) == 5.0)\nassert(abs(-5) == 5)");
    assert_success("let z = imag(1, 2)\nassert(re(z) == 1.0)\nassert(im(z) == 2.0)");
    assert_success("assert(pow(2, 3) == 8)");
}

#[test]
fn conversions() {
    assert_success("assert(bool(\"TRUE\"))\nassert(not bool(0))\nassert(bool(2.5))");
    assert_success("assert(num(\"2.5\") == 2.5)\nassert(int(\"42\") == 42)\nassert(int(-4.56) == -4)");
    assert_success("assert(str(1.5) == \"1.5\")\nassert(str(10) == \"10\")");
    assert_success("assert(typeof(1) == \"integer\")\nassert(typeof([1.0]) == \"numeric[]\")");
    assert!(matches!(runtime_error("int(\"seven\")"), RuntimeError::StringToNumber { .. }));
    assert!(matches!(runtime_error("num(imag(1, 1))"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn null_propagation() {
    assert_success("assert(isnull(abs(null)))\nassert(isnull(hex(null)))\nassert(typeof(int(null)) == \"integer\")");
    assert_success("assert(not isnull(0))\nassert(isnull(tab(null, 0)))");
}

#[test]
fn tables_and_tuples() {
    assert_success("let t = tab(3, \"x\")\nassert(t.count() == 3)\nassert(t[2] == \"x\")");
    assert_success("let r = tup(1, \"a\", 2.5)\nassert(r@3 == 2.5)\nassert(r.count() == 3)");
    assert!(matches!(runtime_error("tab(-1, 0)"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn oversized_allocations_are_range_errors() {
    assert!(matches!(runtime_error("tab(4611686018427387904, 0)"), RuntimeError::OutOfRange { .. }));
    assert!(matches!(runtime_error("tab(4611686018427387904, \"x\")"), RuntimeError::OutOfRange { .. }));
    assert!(matches!(runtime_error("bytes(4611686018427387904)"), RuntimeError::OutOfRange { .. }));
    assert!(matches!(runtime_error("bytes(-2)"), RuntimeError::OutOfRange { .. }));
    assert_success("assert(bytes(4).count() == 4)\nassert(tab(0, 1.5).count() == 0)");
}

#[test]
fn seeded_random_is_reproducible() {
    let draw = |seed| {
        let mut ctx = Context::with_config(&Config::default().with_seed(seed));
        run("let a = random()\nlet b = random(100)\ntup(a, b)", &mut ctx).unwrap()
    };
    assert_eq!(draw(7), draw(7));

    assert_success("let r = random(10)\nassert(r >= 0 and r < 10)\nlet u = random()\nassert(u >= 0.0 and u < 1.0)");
    assert!(matches!(runtime_error("random(0)"), RuntimeError::OutOfRange { .. }));
}

#[test]
fn print_and_assert() {
    assert_success("assert(print(5) == 5)");
    assert!(matches!(runtime_error("assert(1 > 2)"), RuntimeError::AssertionFailed { .. }));
    assert_eq!(run("print(\"x\")", &mut Context::new()).unwrap(), Some(Value::from("x")));
}
