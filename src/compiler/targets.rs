use std::fmt::Display;

use crate::spec::specification::DataType;

/// Host languages a compiled specification can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Python,
    JavaScript,
    Java,
    Cpp,
}

impl TargetLanguage {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Some(TargetLanguage::Python),
            "javascript" | "js" | "node" => Some(TargetLanguage::JavaScript),
            "java" => Some(TargetLanguage::Java),
            "cpp" | "c++" => Some(TargetLanguage::Cpp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::Python => "python",
            TargetLanguage::JavaScript => "javascript",
            TargetLanguage::Java => "java",
            TargetLanguage::Cpp => "cpp",
        }
    }

    /// Statically typed targets get typed declarations and a separate build step.
    pub fn is_static(&self) -> bool {
        matches!(self, TargetLanguage::Java | TargetLanguage::Cpp)
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            TargetLanguage::Python => "py",
            TargetLanguage::JavaScript => "js",
            TargetLanguage::Java => "java",
            TargetLanguage::Cpp => "cpp",
        }
    }

    /// The primitive a statically typed target uses for `data_type`. Dynamic
    /// targets have no mapping.
    pub fn type_name(&self, data_type: DataType) -> Option<&'static str> {
        let name = match (self, data_type) {
            (TargetLanguage::Java, DataType::Integer) => "long",
            (TargetLanguage::Java, DataType::Float) => "double",
            (TargetLanguage::Java, DataType::String) => "String",
            (TargetLanguage::Java, DataType::Boolean) => "boolean",
            (TargetLanguage::Java, DataType::Void) => "void",
            (TargetLanguage::Cpp, DataType::Integer) => "int64_t",
            (TargetLanguage::Cpp, DataType::Float) => "double",
            (TargetLanguage::Cpp, DataType::String) => "std::string",
            (TargetLanguage::Cpp, DataType::Boolean) => "bool",
            (TargetLanguage::Cpp, DataType::Void) => "void",
            _ => return None,
        };
        Some(name)
    }

    /// Stand-in for a type that is not known statically, in a variable declaration.
    pub fn local_placeholder(&self) -> &'static str {
        match self {
            TargetLanguage::Java => "var",
            TargetLanguage::Cpp => "auto",
            TargetLanguage::Python | TargetLanguage::JavaScript => "",
        }
    }

    /// Stand-in for an unknown parameter or return type.
    pub fn signature_placeholder(&self) -> &'static str {
        match self {
            TargetLanguage::Java => "Object",
            TargetLanguage::Cpp => "auto",
            TargetLanguage::Python | TargetLanguage::JavaScript => "",
        }
    }

    pub fn comment(&self) -> &'static str {
        match self {
            TargetLanguage::Python => "#",
            _ => "//",
        }
    }

    /// Fixed build and run commands for targets that need an external toolchain.
    pub fn build_instructions(&self, program_name: &str) -> Option<String> {
        match self {
            TargetLanguage::Java => Some(format!(
                "# Building {name}\n\n\
                 Requires a JDK (11 or newer).\n\n\
                 ```sh\n\
                 javac {name}.java\n\
                 java {name}\n\
                 ```\n",
                name = program_name
            )),
            TargetLanguage::Cpp => Some(format!(
                "# Building {name}\n\n\
                 Requires a C++20 compiler.\n\n\
                 ```sh\n\
                 g++ -std=c++20 -O2 -o {name} {name}.cpp\n\
                 ./{name}\n\
                 ```\n",
                name = program_name
            )),
            TargetLanguage::Python | TargetLanguage::JavaScript => None,
        }
    }

    pub fn run_command(&self, program_name: &str) -> String {
        match self {
            TargetLanguage::Python => format!("python3 {}.py", program_name),
            TargetLanguage::JavaScript => format!("node {}.js", program_name),
            TargetLanguage::Java => format!("javac {0}.java && java {0}", program_name),
            TargetLanguage::Cpp => format!("g++ -std=c++20 -O2 -o {0} {0}.cpp && ./{0}", program_name),
        }
    }
}

impl Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
