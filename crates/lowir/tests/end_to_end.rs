use lowir::emit::Emitter;
use lowir::{lower_program, parse_program, LlvmEmitter, LowerConfig, LowerError};
use pretty_assertions::assert_eq;

fn compile(source: &str) -> Result<String, LowerError> {
    let program = parse_program(source).unwrap();
    let lowered = lower_program(&program, &LowerConfig::default())?;
    Ok(LlvmEmitter::default().emit_to_string(&lowered.module).unwrap())
}

#[test]
fn test_println_hi() {
    let text = compile(
        r#"package main

func main() {
b0:
    %t0 = call $println("hi")
    ret
}
"#,
    )
    .unwrap();

    assert_eq!(
        text,
        r#"; ModuleID = 'main'

@.str = global [2 x i8] c"hi"

declare void @printf(...)

define void @main() {
b0:
  call void (...) @printf(ptr @.str)
  ret void
}
"#
    );
}

#[test]
fn test_one_plus_two() {
    let text = compile("package main\n\nfunc main() {\nb0:\n    %t0 = add 1, 2\n    ret\n}\n").unwrap();
    assert_eq!(
        text,
        "; ModuleID = 'main'\n\ndeclare void @printf(...)\n\ndefine void @main() {\nb0:\n  %t0 = add i64 1, 2\n  ret void\n}\n"
    );
}

#[test]
fn test_helper_only_program_lowers_to_declarations() {
    let text = compile(
        "package main\n\nfunc helper() {\nb0:\n    %t0 = call $println(\"unused\")\n    ret\n}\n",
    )
    .unwrap();
    assert_eq!(text, "; ModuleID = 'main'\n\ndeclare void @printf(...)\n");
}

#[test]
fn test_loop_with_forward_branches() {
    let text = compile(
        r#"package main

func main() {
entry:
    %c = lt 1, 2
    br %c, body, done
body:
    %t0 = call $print("loop")
    jump done
done:
    ret
}
"#,
    )
    .unwrap();

    assert!(text.contains("  %c = icmp slt i64 1, 2\n"), "{}", text);
    assert!(text.contains("  br i1 %c, label %body, label %done\n"), "{}", text);
    assert!(text.contains("  br label %done\n"), "{}", text);
    assert!(text.contains("@.str = global [4 x i8] c\"loop\"\n"), "{}", text);
}

#[test]
fn test_forward_reference_fails_lowering() {
    let err = compile(
        "package main\n\nfunc main() {\nb0:\n    %a = add %b, 1\n    %b = add 2, 3\n    ret\n}\n",
    )
    .unwrap_err();
    assert_eq!(
        err,
        LowerError::UseBeforeDefinition {
            value: "%b".to_string()
        }
    );
}

#[test]
fn test_unknown_builtin_and_instruction() {
    let err = compile("package main\n\nfunc main() {\nb0:\n    %t0 = call $len(\"x\")\n    ret\n}\n")
        .unwrap_err();
    assert_eq!(err, LowerError::UnimplementedBuiltin("len".to_string()));

    let err = compile("package main\n\nfunc main() {\nb0:\n    %p = alloc int\n    ret\n}\n")
        .unwrap_err();
    assert!(matches!(
        err,
        LowerError::UnimplementedInstructionKind { ref kind, .. } if kind == "alloc"
    ));
}
