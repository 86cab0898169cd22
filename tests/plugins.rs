use std::{any::Any, cell::Cell, fs, rc::Rc};

use bloc::{
    error::{ParseError, RuntimeError, ScriptError},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        plugin::core::{Argument, Interface, NativeType, Param, downcast},
        value::{core::Value, types::Type},
    },
    run,
};
use tempfile::tempdir;

fn script_path(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[test]
fn csv_round_trip() {
    let mut ctx = Context::new();
    let src = r#"
        import csv
        let c = csv()
        let fields = c.deserialize("a,\"b,c\",,d")
        assert(fields.count() == 4)
        assert(fields[1] == "b,c")
        assert(fields[2] == "")
        c.serialize(fields)
    "#;
    assert_eq!(run(src, &mut ctx).unwrap(), Some(Value::from("a,\"b,c\",,d")));
}

#[test]
fn csv_dialects() {
    let mut ctx = Context::new();
    let src = r#"
        import csv
        let c = csv(";", "'")
        assert(c.separator() == ";")
        let f = c.deserialize("x;'y;z'")
        assert(f[1] == "y;z")
        assert(isnull(c.deserialize(str(null))))
    "#;
    run(src, &mut ctx).unwrap();

    let err = run("csv(\",\", \",\")", &mut ctx).unwrap_err();
    assert!(matches!(err, ScriptError::Runtime(RuntimeError::Plugin { .. })));
    let err = run("csv(\"ab\")", &mut ctx).unwrap_err();
    assert!(matches!(err, ScriptError::Runtime(RuntimeError::Plugin { .. })));
    let err = run("csv().deserialize(\"\\\"open\")", &mut ctx).unwrap_err();
    assert!(matches!(err, ScriptError::Runtime(RuntimeError::Plugin { .. })));
}

#[test]
fn native_types_are_checked_statically() {
    let mut ctx = Context::new();
    assert!(matches!(run("csv()", &mut ctx), Err(ScriptError::Parse(ParseError::UnknownFunction { .. }))));
    assert!(matches!(run("import tsv", &mut ctx), Err(ScriptError::Parse(ParseError::UnknownType { .. }))));
    run("import csv", &mut ctx).unwrap();
    assert!(matches!(run("csv(1, 2, 3)", &mut ctx), Err(ScriptError::Parse(ParseError::ArgumentCount { .. }))));
    assert!(matches!(run("csv().serialize(1)", &mut ctx),
                     Err(ScriptError::Parse(ParseError::ArgumentType { .. }))));
    assert!(matches!(run("csv().separator(1)", &mut ctx),
                     Err(ScriptError::Parse(ParseError::ArgumentCount { .. }))));
}

#[test]
fn file_write_then_read() {
    let dir = tempdir().unwrap();
    let path = script_path(&dir.path().join("out.txt"));
    let mut ctx = Context::new();

    let src = format!(
                      r#"
        import file
        let f = file("{path}", "w")
        assert(f.write("one\n") == 4)
        f.write("two\n")
        assert(f.close())
        assert(not f.isopen())
    "#
    );
    run(&src, &mut ctx).unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "one\ntwo\n");

    let src = format!(
                      r#"
        let g = file("{path}", "a")
        g.write("three\n")
        g.flush()
        let r = file("{path}", "r")
        let line = ""
        let all = ""
        while r.readln(line) do {{ all += line + "|" }}
        all
    "#
    );
    assert_eq!(run(&src, &mut ctx).unwrap(), Some(Value::from("one|two|three|")));
}

#[test]
fn file_is_flushed_when_released() {
    let dir = tempdir().unwrap();
    let path = script_path(&dir.path().join("released.txt"));
    let mut ctx = Context::new();

    let src = format!("import file\nif true do {{ let f = file(\"{path}\", \"w\")\nf.write(\"kept\") }}");
    run(&src, &mut ctx).unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("released.txt")).unwrap(), "kept");
}

#[test]
fn file_errors_are_plugin_errors() {
    let dir = tempdir().unwrap();
    let missing = script_path(&dir.path().join("missing.txt"));
    let mut ctx = Context::new();
    run("import file", &mut ctx).unwrap();

    let err = run(&format!("file(\"{missing}\", \"r\")"), &mut ctx).unwrap_err();
    assert!(matches!(err, ScriptError::Runtime(RuntimeError::Plugin { .. })));
    let err = run(&format!("file(\"{missing}\", \"x\")"), &mut ctx).unwrap_err();
    assert!(matches!(err, ScriptError::Runtime(RuntimeError::Plugin { .. })));

    let src = format!("let w = file(\"{missing}\", \"w\")\nlet s = \"\"\nw.readln(s)");
    let err = run(&src, &mut ctx).unwrap_err();
    assert!(err.to_string().contains("not open for reading"));

    let src = "let ok = false\ntry do { file(\"\", \"r\") } catch plugin do { ok = true }\nok";
    assert_eq!(run(src, &mut ctx).unwrap(), Some(Value::Boolean(true)));
}

/// A counter native type used to observe the object lifecycle.
struct Counter {
    interface: Interface,
    released:  Rc<Cell<usize>>,
}

impl NativeType for Counter {
    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn construct(&self, _ctor: usize, _ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<Box<dyn Any>> {
        let start = args.first().map_or(Ok(0), |v| v.integer(line))?;
        Ok(Box::new(start))
    }

    fn invoke(&self,
              object: &mut dyn Any,
              _method: usize,
              _ctx: &mut Context,
              _args: &[Argument],
              line: usize)
              -> EvalResult<Value> {
        let n = downcast::<i64>(self, object, line)?;
        *n += 1;
        Ok(Value::Integer(*n))
    }

    fn destroy(&self, _object: Box<dyn Any>) {
        self.released.set(self.released.get() + 1);
    }
}

#[test]
fn objects_alias_and_are_destroyed_once() {
    let released = Rc::new(Cell::new(0));
    let counter = Counter { interface: Interface::new("counter").constructor(vec![])
                                                                 .constructor(vec![Param::input("start",
                                                                                                Type::integer())])
                                                                 .method("bump", Type::integer(), vec![]),
                            released:  Rc::clone(&released), };
    let mut ctx = Context::new();
    ctx.register(Rc::new(counter));

    let src = "import counter\nlet a = counter(10)\nlet b = a\nb.bump()\na.bump()";
    assert_eq!(run(src, &mut ctx).unwrap(), Some(Value::Integer(12)));
    assert_eq!(released.get(), 0);

    run("a = counter()\nb = a", &mut ctx).unwrap();
    assert_eq!(released.get(), 1);
    assert_eq!(run("typeof(a)", &mut ctx).unwrap(), Some(Value::from("counter")));
}
