use lowir_core::{BinaryOp, Constant, IrError, Module, Signature, Symbol, Type, Value};

#[test]
fn test_module_creation() {
    let module = Module::new("TestModule");
    assert_eq!(module.name, "TestModule");
    assert!(module.globals.is_empty());
    assert!(module.functions.is_empty());
}

#[test]
fn test_symbols_resolve_to_their_kind() {
    let mut module = Module::new("m");
    let printf = module
        .declare_function("printf", Signature::void().variadic())
        .unwrap();
    let g = module.define_global(".str", Constant::char_array("x"));

    assert_eq!(module.lookup("printf"), Some(Symbol::Function(printf)));
    assert_eq!(module.lookup(".str"), Some(Symbol::Global(g)));
    assert_eq!(module.lookup("main"), None);
    assert!(module.function_by_name(".str").is_none());
}

#[test]
fn test_function_with_two_blocks() {
    let mut module = Module::new("m");
    let f = module
        .define_function("sum", Signature::new(Type::I64))
        .unwrap();
    let entry = module.append_block(f, "entry").unwrap();
    let exit = module.append_block(f, "exit").unwrap();

    let total = module
        .ins(f, entry)
        .unwrap()
        .binary(BinaryOp::Mul, Value::i64(6), Value::i64(7), Some("total"))
        .unwrap();
    module.ins(f, entry).unwrap().br(exit).unwrap();
    module.ins(f, exit).unwrap().ret(Some(total)).unwrap();

    let function = module.function(f).unwrap();
    assert_eq!(function.blocks.len(), 2);
    assert_eq!(function.instruction_count(), 3);
    assert!(function.blocks.iter().all(|b| b.is_terminated()));
    assert_eq!(function.locals[0].name, "total");
}

#[test]
fn test_arity_checked_for_fixed_signatures() {
    let mut module = Module::new("m");
    let callee = module
        .declare_function("puts", Signature::new(Type::I32).param(Type::Ptr))
        .unwrap();
    let main = module.define_function("main", Signature::void()).unwrap();
    let b0 = module.append_block(main, "b0").unwrap();

    let err = module
        .ins(main, b0)
        .unwrap()
        .call(Value::Function(callee), vec![], None)
        .unwrap_err();
    assert_eq!(
        err,
        IrError::ArgumentCount {
            function: "puts".to_string(),
            expected: 1,
            found: 0,
        }
    );
}

#[test]
fn test_branch_to_missing_block() {
    let mut module = Module::new("m");
    let main = module.define_function("main", Signature::void()).unwrap();
    let b0 = module.append_block(main, "b0").unwrap();
    let err = module
        .ins(main, b0)
        .unwrap()
        .br(lowir_core::BlockId(9))
        .unwrap_err();
    assert!(matches!(err, IrError::UnknownBlock { .. }));
}
