//! End-to-end tests driving the public `tokenize` / `parse` / `validate`
//! operations.

use fasm::opcode::ImmediateKind;
use fasm::error::{CompileError, SemanticError, SyntaxError};
use fasm::{Program, TokenKind, compile, parse, tokenize, validate};

const SAMPLE: &str = r#"global $counter int 0
global $banner str "hello, world"
global $mask int 4294967295

func $main($argc int, $argv str)(int)
    local $i int 0
    local $name str "main"
    const $limit int -10
    const $greeting str "hi"
    ldc $greeting
    ldc 42
    lget $argc
    gget $counter
    add
    jt $done
    call $helper
    drop
    return 1
end

func $helper()()
    nop
end

func $pair($a int)(int, str)
    lget $a
    ldc "two"
    return 2
end
"#;

fn compiled(source: &str) -> Program {
  compile(source).unwrap()
}

#[test]
fn counts_match_source() {
  let program = compiled(SAMPLE);
  assert_eq!(program.globals.len(), 3);
  assert_eq!(program.functions.len(), 3);

  let main = program.function("main").unwrap();
  assert_eq!(main.params.len(), 2);
  assert_eq!(main.returns.len(), 1);
  assert_eq!(main.locals.len(), 2);
  assert_eq!(main.constants.len(), 2);
  assert_eq!(main.body.len(), 9);

  let helper = program.function("helper").unwrap();
  assert!(helper.params.is_empty());
  assert!(helper.returns.is_empty());
  assert_eq!(helper.body.len(), 1);

  assert_eq!(program.function("pair").unwrap().returns.len(), 2);
}

#[test]
fn round_trip_through_source_form() {
  let program = compiled(SAMPLE);
  let printed = program.to_string();
  let reparsed = compiled(&printed);
  assert_eq!(reparsed, program);
  assert_eq!(reparsed.to_string(), printed);
}

#[test]
fn round_trip_without_globals_or_functions() {
  for source in [
    "func $f()()\nnop\nend\n",
    "func $f()()\nnop\nend\nfunc $g($a int)(int)\nreturn 1\nend\n",
    "global $a int 1\nglobal $b str \"x\"\n",
    "",
  ] {
    let program = compiled(source);
    let printed = program.to_string();
    assert!(!printed.starts_with('\n'), "{printed:?}");
    assert_eq!(compiled(&printed), program, "{printed:?}");
  }
  assert_eq!(compiled("").to_string(), "");
}

#[test]
fn name_token_is_identical_in_params_and_immediates() {
  let names: Vec<String> = tokenize("func $f($count int)()\nlget $count\nend\n")
    .map(Result::unwrap)
    .filter(|token| token.kind == TokenKind::Name)
    .map(|token| token.text().to_string())
    .collect();
  assert_eq!(names, ["f", "count", "count"]);
}

#[test]
fn stages_compose_explicitly() {
  let program = parse(tokenize("func $f()(int)\nreturn 1\nend\n")).unwrap();
  assert_eq!(program.functions[0].body[0].opcode.opcode, None);
  let program = validate(program).unwrap();
  let instr = &program.functions[0].body[0];
  assert_eq!(instr.opcode.opcode.map(|op| op.mnemonic()), Some("return"));
  let immediate = instr.immediate.as_ref().unwrap();
  assert_eq!((immediate.kind, immediate.value), (ImmediateKind::Integer, Some(1)));
}

#[test]
fn return_arity_must_match_declared_returns() {
  let err = compile("func $f()(int)\nreturn 0\nend\n").unwrap_err();
  assert_eq!(
    err,
    CompileError::Semantic {
      source: SemanticError::ReturnArityMismatch {
        expected: 1,
        found: 0,
        function: "f".into(),
      }
    }
  );
  assert_eq!(
    err.to_string(),
    "semantic error: expected 1 return values instead of 0 in function 'f'"
  );
  assert!(compile("func $f()(int)\nreturn 1\nend\n").is_ok());
}

#[test]
fn jump_targets_must_be_names() {
  let err = compile("func $f()()\njmp 5\nend\n").unwrap_err();
  assert!(matches!(
    err,
    CompileError::Semantic {
      source: SemanticError::ImmediateKindNotAllowed { .. }
    }
  ));
  assert!(compile("func $f()()\njmp $label\nend\n").is_ok());
}

#[test]
fn oversized_global_is_out_of_range() {
  let err = compile("global $a int 99999999999\n").unwrap_err();
  assert_eq!(
    err.to_string(),
    "semantic error: value '99999999999' out of range for 'int'"
  );
}

#[test]
fn duplicate_names_within_a_function() {
  for source in [
    "func $f()()\nlocal $v int 1\nlocal $v int 2\nend\n",
    "func $f($v int)()\nlocal $v int 1\nend\n",
  ] {
    assert!(matches!(
      compile(source).unwrap_err(),
      CompileError::Semantic {
        source: SemanticError::DuplicateName { .. }
      }
    ));
  }
}

#[test]
fn syntax_errors_stop_the_pipeline() {
  let err = compile("global $x int 1\nglobal $y int @\n").unwrap_err();
  assert_eq!(
    err,
    CompileError::Syntax {
      source: SyntaxError::UnrecognizedSymbol {
        symbol: '@',
        line: 2,
      }
    }
  );

  let err = compile("func $f()()\nldc \"open\nend\n").unwrap_err();
  assert!(matches!(
    err,
    CompileError::Syntax {
      source: SyntaxError::UnterminatedString { line: 2 }
    }
  ));
}

#[test]
fn syntax_error_wins_over_semantic_error() {
  let err = compile("global $a float 1\nfunc\n").unwrap_err();
  assert!(matches!(err, CompileError::Syntax { .. }));
}

#[test]
fn leading_blank_line_is_a_stray_break() {
  let err = compile("\nglobal $a int 1\n").unwrap_err();
  assert!(matches!(
    err,
    CompileError::Syntax {
      source: SyntaxError::UnexpectedToken {
        found: TokenKind::LBreak,
        ..
      }
    }
  ));
}
