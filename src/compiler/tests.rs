use crate::{
    errors::errors::{Error, ErrorImpl, ErrorKind},
    generator::artifact::ArtifactRole,
    lexer::builder::LexerBuilder,
    parser::builder::ParserBuilder,
    spec::{
        fixtures::calculator,
        specification::{
            Associativity, BuiltinFunction, DataType, LanguageKind, Operator, Parameter,
            Specification,
        },
    },
};

use super::{
    builder::{program_name, CompilerBuilder, CompilerDefinition},
    targets::TargetLanguage,
};

fn compile_with(spec: &Specification, source: &str) -> Result<String, Error> {
    let lexer = LexerBuilder::new(spec).build()?;
    let parser = ParserBuilder::new(spec, &lexer).build()?;
    let compiler = CompilerBuilder::new(spec, &parser).build()?;
    compiler.compile(&parser.parse(lexer.tokenize(source)?)?)
}

fn compile(target: &str, source: &str) -> Result<String, Error> {
    compile_with(&calculator(LanguageKind::Compiled).with_target(target), source)
}

fn definition(target: &str) -> CompilerDefinition {
    let spec = calculator(LanguageKind::Compiled).with_target(target);
    let lexer = LexerBuilder::new(&spec).build().unwrap();
    let parser = ParserBuilder::new(&spec, &lexer).build().unwrap();
    CompilerBuilder::new(&spec, &parser).build().unwrap()
}

const SAMPLE: &str = "x = 1\nif x == 1 { print(x + 1) }";

#[test]
fn test_python_script() {
    assert_eq!(
        compile("python", SAMPLE).unwrap(),
        "# Calc 1.0.0 compiled to python by langforge\n\nx = 1\nif x == 1:\n    print(x + 1)\n"
    );
}

#[test]
fn test_javascript_script() {
    assert_eq!(
        compile("javascript", SAMPLE).unwrap(),
        "// Calc 1.0.0 compiled to javascript by langforge\n\"use strict\";\n\n\
         let x = 1;\nif (x === 1) {\n    console.log(x + 1);\n}\n"
    );
}

#[test]
fn test_java_class() {
    let output = compile("java", SAMPLE).unwrap();

    assert!(output.contains("public class Calc {"));
    assert!(output.contains("    public static void main(String[] args) {"));
    assert!(output.contains("        long x = 1;\n"));
    assert!(output.contains("        if (x == 1) {\n            System.out.println(x + 1);\n        }\n"));
    assert!(output.ends_with("    }\n}\n"));
}

#[test]
fn test_cpp_main() {
    let output = compile("cpp", SAMPLE).unwrap();

    assert!(output.contains("#include <iostream>"));
    assert!(output.contains("int main() {\n    std::cout << std::boolalpha;\n"));
    assert!(output.contains("    int64_t x = 1;\n"));
    assert!(output.contains("std::cout << (x + 1) << std::endl;"));
    assert!(output.ends_with("    return 0;\n}\n"));
}

#[test]
fn test_functions() {
    let source = "
        function fact(n) {
            if n <= 1 { return 1 }
            return n * fact(n - 1)
        }
        print(fact(10))
    ";

    assert_eq!(
        compile("python", source).unwrap(),
        "# Calc 1.0.0 compiled to python by langforge\n\n\
         def fact(n):\n    if n <= 1:\n        return 1\n    return n * fact(n - 1)\nprint(fact(10))\n"
    );

    let java = compile("java", source).unwrap();
    assert!(java.contains("    static long fact(long n) {\n"));
    assert!(java.contains("        return n * fact(n - 1);\n"));
    assert!(java.contains("        System.out.println(fact(10));\n"));

    let cpp = compile("cpp", source).unwrap();
    assert!(cpp.contains("int64_t fact(int64_t n);\n"));
    assert!(cpp.contains("int64_t fact(int64_t n) {\n"));
}

#[test]
fn test_declarations_happen_once() {
    let output = compile("java", "total = 0\ni = 0\nwhile i < 3 { total = total + i; i = i + 1 }").unwrap();

    assert!(output.contains("long total = 0;"));
    assert!(output.contains("            total = total + i;\n"));
    assert!(output.contains("            i = i + 1;\n"));
    assert_eq!(output.matches("long i").count(), 1);

    let js = compile("javascript", "y = 1.5\n{ z = y * 2.0 }").unwrap();
    assert!(js.contains("let y = 1.5;\n{\n    let z = y * 2.0;\n}\n"));
}

#[test]
fn test_sibling_blocks_declare_their_own_types() {
    let java = compile("java", "{ v = 1\nprint(v) }\n{ v = \"one\"\nprint(v) }").unwrap();
    assert!(java.contains("{\n            long v = 1;\n"));
    assert!(java.contains("{\n            String v = \"one\";\n"));

    let err = compile("cpp", "x = 1\nif x < 2 { y = 1 }\nprint(y)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeInference);
}

#[test]
fn test_outer_writes() {
    let source = "
        count = 0
        function bump(by) { count = count + by }
        bump(2)
        print(count)
    ";

    let python = compile("python", source).unwrap();
    assert!(python.contains("def bump(by):\n    global count\n    count = count + by\n"));

    let js = compile("javascript", source).unwrap();
    assert!(js.contains("function bump(by) {\n    count = count + by;\n}\n"));

    let err = compile("java", source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedConstruct);
    assert!(matches!(
        err.get_impl(),
        ErrorImpl::UnsupportedConstruct { construct, target }
            if construct.contains("count") && target == "java"
    ));
}

#[test]
fn test_operator_renderings() {
    let python = compile("python", "a = 7 / 2\nb = 7.0 / 2.0\np = 2 ** 10\nok = true and !false").unwrap();
    assert!(python.contains("a = _trunc_div(7, 2)\n"));
    assert!(python.contains("b = 7.0 / 2.0\n"));
    assert!(python.contains("p = 2 ** 10\n"));
    assert!(python.contains("ok = True and (not False)\n"));

    let js = compile("javascript", "a = 7 / 2").unwrap();
    assert!(js.contains("let a = Math.trunc(7 / 2);"));

    let java = compile("java", "p = 2 ** 10\nok = true and !false\ns = \"a\"\nt = s == \"a\"").unwrap();
    assert!(java.contains("long p = (long) Math.pow(2, 10);"));
    assert!(java.contains("boolean ok = true && (!false);"));
    assert!(java.contains("boolean t = s.equals(\"a\");"));

    let cpp = compile("cpp", "m = 7.5 % 2.0\ns = \"a\"").unwrap();
    assert!(cpp.contains("double m = std::fmod(7.5, 2.0);"));
    assert!(cpp.contains("std::string s = std::string(\"a\");"));
}

#[test]
fn test_python_integer_division_truncates() {
    let python = compile("python", "q = (0 - 7) / 2\nr = (0 - 7) % 2\nf = 0.0 - 7.5 % 2.0").unwrap();

    assert!(python.contains("import math\n"));
    assert!(python.contains(
        "def _trunc_div(a, b):\n    q = abs(a) // abs(b)\n    return q if (a < 0) == (b < 0) else -q\n"
    ));
    assert!(python.contains("def _trunc_mod(a, b):\n    return a - b * _trunc_div(a, b)\n"));
    assert!(python.contains("q = _trunc_div((0 - 7), 2)\n"));
    assert!(python.contains("r = _trunc_mod((0 - 7), 2)\n"));
    assert!(python.contains("f = 0.0 - (math.fmod(7.5, 2.0))\n"));
    assert!(python.find("def _trunc_div").unwrap() < python.find("q = ").unwrap());

    // Without integer division no helper is emitted.
    let plain = compile("python", "b = 7.0 / 2.0").unwrap();
    assert!(!plain.contains("_trunc_div"));
}

#[test]
fn test_printed_floats_keep_their_fraction() {
    let source = "x = 1.5\nprint(x * 2.0, 3)";

    let js = compile("javascript", source).unwrap();
    assert!(js.contains("function _float_text(x) {\n"));
    assert!(js.contains("console.log(_float_text(x * 2.0), 3);"));

    let cpp = compile("cpp", source).unwrap();
    assert!(cpp.contains("#include <charconv>\n"));
    assert!(cpp.contains("std::string _float_text(double x) {\n"));
    assert!(cpp.contains("std::cout << _float_text((x * 2.0)) << \" \" << 3 << std::endl;"));
    assert!(cpp.find("_float_text(double").unwrap() < cpp.find("int main()").unwrap());

    let python = compile("python", source).unwrap();
    assert!(python.contains("print(x * 2.0, 3)\n"));

    // Integer output needs no helper.
    assert!(!compile("cpp", SAMPLE).unwrap().contains("_float_text"));
}

#[test]
fn test_nested_operations_keep_their_grouping() {
    let output = compile("python", "r = (1 + 2) * 3 - -4").unwrap();
    assert!(output.contains("r = ((1 + 2) * 3) - (-4)\n"));
}

#[test]
fn test_swapped_template() {
    let spec = calculator(LanguageKind::Compiled).with_operator(Operator::new(
        "~",
        10,
        Associativity::Left,
        "arithmetic",
        "b - a",
    ));

    let output = compile_with(&spec, "r = 10 ~ 3").unwrap();
    assert!(output.contains("r = 3 - 10\n"));
}

#[test]
fn test_else_if_chains() {
    let source = "x = 2\nif x == 1 { print(1) } else if x == 2 { print(2) } else { print(3) }";

    assert!(compile("python", source)
        .unwrap()
        .contains("if x == 1:\n    print(1)\nelif x == 2:\n    print(2)\nelse:\n    print(3)\n"));
    assert!(compile("javascript", source).unwrap().contains(
        "if (x === 1) {\n    console.log(1);\n} else if (x === 2) {\n    console.log(2);\n} else {\n    console.log(3);\n}\n"
    ));
}

#[test]
fn test_python_needs_pass_and_imports() {
    let output = compile("python", "function noop() { }\nnoop()\nr = sqrt(2.0)").unwrap();

    assert!(output.contains("import math\n"));
    assert!(output.contains("def noop():\n    pass\nnoop()\n"));
    assert!(output.contains("r = math.sqrt(2.0)\n"));
}

#[test]
fn test_string_literals_are_escaped() {
    let output = compile("python", "print(\"a\\\"b\\n\")").unwrap();
    assert!(output.contains("print(\"a\\\"b\\n\")"));
}

#[test]
fn test_unsupported_constructs() {
    let spec = calculator(LanguageKind::Compiled)
        .with_target("cpp")
        .with_builtin(BuiltinFunction::new(
            "shout",
            vec![Parameter::new("s", DataType::String)],
            DataType::String,
            "s.upper()",
        ));
    let err = compile_with(&spec, "print(shout(\"hey\"))").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedConstruct);
    assert_eq!(err.get_position().line, 1);

    let err = compile("java", "x = 1\nx + 1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedConstruct);
    assert_eq!(err.get_position().line, 2);

    let err = compile("cpp", "function outer() { function inner() { }\ninner() }\nouter()").unwrap_err();
    assert!(matches!(
        err.get_impl(),
        ErrorImpl::UnsupportedConstruct { construct, .. } if construct.contains("inner")
    ));
}

#[test]
fn test_type_errors_stop_compilation() {
    let err = compile("java", "x = 1\nx = \"s\"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeInference);
}

#[test]
fn test_placeholders() {
    let java = compile("java", "function id(v) { return v }").unwrap();
    assert!(java.contains("static Object id(Object v) {"));

    let cpp = compile("cpp", "function id(v) { return v }").unwrap();
    assert!(cpp.contains("auto id(auto v) {"));
    assert!(!cpp.contains("auto id(auto v);"));
}

#[test]
fn test_targets() {
    assert_eq!(TargetLanguage::from_name("C++"), Some(TargetLanguage::Cpp));
    assert_eq!(TargetLanguage::from_name("node"), Some(TargetLanguage::JavaScript));
    assert_eq!(TargetLanguage::from_name("py"), Some(TargetLanguage::Python));
    assert_eq!(TargetLanguage::from_name("cobol"), None);

    assert_eq!(TargetLanguage::Java.type_name(DataType::Integer), Some("long"));
    assert_eq!(TargetLanguage::Cpp.type_name(DataType::String), Some("std::string"));
    assert_eq!(TargetLanguage::Python.type_name(DataType::Integer), None);
    assert!(TargetLanguage::Python.build_instructions("Calc").is_none());
}

#[test]
fn test_program_name() {
    assert_eq!(program_name("Calc"), "Calc");
    assert_eq!(program_name("my lang"), "MyLang");
    assert_eq!(program_name("2d-shapes"), "Program2dShapes");
    assert_eq!(program_name(""), "Program");
}

#[test]
fn test_artifacts() {
    let java = definition("java");
    let artifacts = java.artifacts();
    let roles: Vec<ArtifactRole> = artifacts.iter().map(|artifact| artifact.role).collect();
    assert_eq!(
        roles,
        vec![
            ArtifactRole::Emitter,
            ArtifactRole::CompilerDriver,
            ArtifactRole::BuildInstructions,
        ]
    );

    assert!(artifacts[0].content.contains("integer -> long"));
    assert!(artifacts[0].content.contains("** pow -> Math.pow(a, b)"));
    assert!(artifacts[0].content.contains("== eq -> a == b"));
    assert!(artifacts[1].content.contains("-> Calc.java"));
    assert!(artifacts[2].content.contains("javac Calc.java"));
    assert_eq!(java.output_file_name(), "Calc.java");

    let python = definition("python").artifacts();
    assert_eq!(python.len(), 2);
    assert!(python[0].content.contains("integer -> (dynamic)"));
    assert!(python[0].content.contains("and and -> a and b"));
}

#[test]
fn test_compilation_is_deterministic() {
    let source = "function sq(v) { return v * v }\nprint(sq(3))";
    assert_eq!(compile("cpp", source).unwrap(), compile("cpp", source).unwrap());
}
