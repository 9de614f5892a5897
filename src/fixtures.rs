#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;
    use std::fmt::Debug;

    use serde_json::{Value, json};

    use crate::env::{EnvFormat, EnvSource};
    use crate::field;
    use crate::format::Format;
    use crate::json::JsonFormat;
    use crate::{Config, Registry, Variable, Vector};

    /// A format the shared scenario tests can drive.
    pub trait TestFormat: Format<Dest: Default> + Default {
        type Doc: Clone + Debug + Default + PartialEq;

        fn source(doc: &Self::Doc) -> Self::Source;
        fn dest(dest: Self::Dest) -> Self::Doc;
        fn merge(base: &Self::Doc, overlay: &Self::Doc) -> Self::Doc;
    }

    impl TestFormat for EnvFormat {
        type Doc = BTreeMap<String, String>;

        fn source(doc: &Self::Doc) -> EnvSource {
            EnvSource::from(doc.clone())
        }

        fn dest(dest: Self::Dest) -> Self::Doc {
            dest
        }

        fn merge(base: &Self::Doc, overlay: &Self::Doc) -> Self::Doc {
            let mut merged = base.clone();
            merged.extend(overlay.clone());
            merged
        }
    }

    impl TestFormat for JsonFormat {
        type Doc = Value;

        fn source(doc: &Value) -> Value {
            doc.clone()
        }

        fn dest(dest: Value) -> Value {
            dest
        }

        fn merge(base: &Value, overlay: &Value) -> Value {
            match (base, overlay) {
                (Value::Object(base), Value::Object(overlay)) => {
                    let mut merged = base.clone();
                    merged.extend(overlay.clone());
                    Value::Object(merged)
                }
                (base, Value::Null) => base.clone(),
                (_, overlay) => overlay.clone(),
            }
        }
    }

    /// What a schema emits with only defaults, and what the optional and
    /// mandatory halves of a full source look like.
    pub struct Scenario<F: TestFormat> {
        pub default: F::Doc,
        pub optional: F::Doc,
        pub mandatory: F::Doc,
    }

    pub fn env_doc(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -- Scalars ---------------------------------------------------------------

    #[derive(Debug)]
    pub struct VarsConfig {
        pub int_var: Variable<i32>,
        pub double_var: Variable<f64>,
        pub str_var: Variable<String>,
        pub longint_var: Variable<i64>,
        pub optional_int_var: Variable<i32>,
    }

    impl Default for VarsConfig {
        fn default() -> Self {
            Self {
                int_var: Variable::new(),
                double_var: Variable::new(),
                str_var: Variable::new(),
                longint_var: Variable::new(),
                optional_int_var: Variable::with_default(111),
            }
        }
    }

    impl Config for VarsConfig {
        fn register(&self, _path: &str, registry: &mut Registry<Self>) {
            registry
                .format::<EnvFormat>()
                .variable("INT", field!(int_var))
                .variable("DOUBLE", field!(double_var))
                .variable("STRING", field!(str_var))
                .variable("LONGINT", field!(longint_var))
                .variable("OPT_INT", field!(optional_int_var));
            registry
                .format::<JsonFormat>()
                .variable("/int", field!(int_var))
                .variable("/double", field!(double_var))
                .variable("/string", field!(str_var))
                .variable("/longint", field!(longint_var))
                .variable("/opt_int", field!(optional_int_var));
        }
    }

    pub fn vars_env() -> Scenario<EnvFormat> {
        Scenario {
            default: env_doc(&[("OPT_INT", "111")]),
            optional: env_doc(&[("OPT_INT", "6700")]),
            mandatory: env_doc(&[
                ("STRING", "value"),
                ("INT", "123"),
                ("LONGINT", "123456789000"),
                ("DOUBLE", "123456.789"),
            ]),
        }
    }

    pub fn vars_json() -> Scenario<JsonFormat> {
        Scenario {
            default: json!({"opt_int": 111}),
            optional: json!({"opt_int": 6700}),
            mandatory: json!({
                "string": "value",
                "int": 123,
                "longint": 123456789000i64,
                "double": 123456.789,
            }),
        }
    }

    // -- Lists -----------------------------------------------------------------

    #[derive(Debug)]
    pub struct VectorConfig {
        pub vector: Vector<i32>,
        pub optional_vector: Vector<i32>,
        pub optional_empty_vector: Vector<i32>,
        pub optional_default_vector: Vector<i32>,
    }

    impl Default for VectorConfig {
        fn default() -> Self {
            Self {
                vector: Vector::new(),
                optional_vector: Vector::new_optional(),
                optional_empty_vector: Vector::with_default(vec![]),
                optional_default_vector: Vector::with_default(vec![1, 2, 3]),
            }
        }
    }

    impl Config for VectorConfig {
        fn register(&self, _path: &str, registry: &mut Registry<Self>) {
            registry
                .format::<EnvFormat>()
                .vector("VECTOR", field!(vector))
                .vector("OPT_VECTOR", field!(optional_vector))
                .vector("OPT_EMP_VECTOR", field!(optional_empty_vector))
                .vector("OPT_DEF_VECTOR", field!(optional_default_vector));
            registry
                .format::<JsonFormat>()
                .vector("/vector", field!(vector))
                .vector("/opt_vector", field!(optional_vector))
                .vector("/opt_emp_vector", field!(optional_empty_vector))
                .vector("/opt_def_vector", field!(optional_default_vector));
        }
    }

    pub fn vector_env() -> Scenario<EnvFormat> {
        Scenario {
            default: env_doc(&[
                ("OPT_DEF_VECTOR_0", "1"),
                ("OPT_DEF_VECTOR_1", "2"),
                ("OPT_DEF_VECTOR_2", "3"),
            ]),
            optional: env_doc(&[
                ("OPT_EMP_VECTOR_0", "11"),
                ("OPT_EMP_VECTOR_1", "22"),
                ("OPT_EMP_VECTOR_2", "33"),
                ("OPT_DEF_VECTOR_0", "44"),
                ("OPT_DEF_VECTOR_1", "55"),
                ("OPT_DEF_VECTOR_2", "66"),
            ]),
            mandatory: env_doc(&[("VECTOR_0", "123"), ("VECTOR_1", "456"), ("VECTOR_2", "789")]),
        }
    }

    pub fn vector_json() -> Scenario<JsonFormat> {
        Scenario {
            default: json!({"opt_def_vector": [1, 2, 3]}),
            optional: json!({"opt_emp_vector": [11, 22, 33], "opt_def_vector": [44, 55, 66]}),
            mandatory: json!({"vector": [123, 456, 789]}),
        }
    }

    // -- Nested sections -------------------------------------------------------

    /// One mandatory int; the section itself may be marked optional.
    #[derive(Debug, Default)]
    pub struct IntSection {
        pub int_var: Variable<i32>,
        optional: bool,
    }

    impl IntSection {
        pub fn new_optional() -> Self {
            Self {
                optional: true,
                ..Default::default()
            }
        }
    }

    impl Config for IntSection {
        fn register(&self, path: &str, registry: &mut Registry<Self>) {
            registry
                .format::<EnvFormat>()
                .variable(format!("{path}_INT"), field!(int_var));
            registry
                .format::<JsonFormat>()
                .variable(format!("{path}/int"), field!(int_var));
        }

        fn optional(&self) -> bool {
            self.optional
        }
    }

    /// A mandatory section whose only child has a default.
    #[derive(Debug)]
    pub struct DefaultIntSection {
        pub int_var: Variable<i32>,
    }

    impl Default for DefaultIntSection {
        fn default() -> Self {
            Self {
                int_var: Variable::with_default(300),
            }
        }
    }

    impl Config for DefaultIntSection {
        fn register(&self, path: &str, registry: &mut Registry<Self>) {
            registry
                .format::<EnvFormat>()
                .variable(format!("{path}_INT"), field!(int_var));
            registry
                .format::<JsonFormat>()
                .variable(format!("{path}/int"), field!(int_var));
        }
    }

    #[derive(Debug)]
    pub struct NestedConfig {
        pub var_config: IntSection,
        pub var_config_opt: IntSection,
        pub opt_var_config: DefaultIntSection,
    }

    impl Default for NestedConfig {
        fn default() -> Self {
            Self {
                var_config: IntSection::default(),
                var_config_opt: IntSection::new_optional(),
                opt_var_config: DefaultIntSection::default(),
            }
        }
    }

    impl Config for NestedConfig {
        fn register(&self, path: &str, registry: &mut Registry<Self>) {
            registry
                .format::<EnvFormat>()
                .config(format!("{path}_NESTED"), field!(var_config))
                .config(format!("{path}_OPT_NESTED"), field!(var_config_opt))
                .config(format!("{path}_NESTED_OPT"), field!(opt_var_config));
            registry
                .format::<JsonFormat>()
                .config(format!("{path}/nested"), field!(var_config))
                .config(format!("{path}/opt_nested"), field!(var_config_opt))
                .config(format!("{path}/nested_opt"), field!(opt_var_config));
        }
    }

    pub fn nested_env() -> Scenario<EnvFormat> {
        Scenario {
            default: env_doc(&[("_NESTED_OPT_INT", "300")]),
            optional: env_doc(&[("_OPT_NESTED_INT", "100"), ("_NESTED_OPT_INT", "200")]),
            mandatory: env_doc(&[("_NESTED_INT", "123")]),
        }
    }

    pub fn nested_json() -> Scenario<JsonFormat> {
        Scenario {
            default: json!({"nested_opt": {"int": 300}}),
            optional: json!({"opt_nested": {"int": 100}, "nested_opt": {"int": 200}}),
            mandatory: json!({"nested": {"int": 123}}),
        }
    }

    // -- Lists of sections -----------------------------------------------------

    #[derive(Debug, PartialEq)]
    pub struct NodeSchema {
        pub host: Variable<String>,
        pub port: Variable<u16>,
    }

    impl Default for NodeSchema {
        fn default() -> Self {
            Self {
                host: Variable::new(),
                port: Variable::with_default(80),
            }
        }
    }

    impl Config for NodeSchema {
        fn register(&self, path: &str, registry: &mut Registry<Self>) {
            registry
                .format::<EnvFormat>()
                .variable(format!("{path}_HOST"), field!(host))
                .variable(format!("{path}_PORT"), field!(port));
            registry
                .format::<JsonFormat>()
                .variable(format!("{path}/host"), field!(host))
                .variable(format!("{path}/port"), field!(port));
        }
    }

    #[derive(Debug, Default)]
    pub struct ClusterConfig {
        pub nodes: Vector<NodeSchema>,
    }

    impl Config for ClusterConfig {
        fn register(&self, path: &str, registry: &mut Registry<Self>) {
            registry
                .format::<EnvFormat>()
                .config_vector(format!("{path}NODES"), field!(nodes));
            registry
                .format::<JsonFormat>()
                .config_vector(format!("{path}/nodes"), field!(nodes));
        }
    }

    // -- Formats bound to different fields -------------------------------------

    /// `debug` is bound only for JSON (and TOML); `env_only` only for the environment.
    #[derive(Debug)]
    pub struct ServerConfig {
        pub host: Variable<String>,
        pub port: Variable<u32>,
        pub tags: Vector<String>,
        pub debug: Variable<bool>,
        pub env_only: Variable<String>,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                host: Variable::with_default("localhost".to_string()),
                port: Variable::new(),
                tags: Vector::new_optional(),
                debug: Variable::new(),
                env_only: Variable::with_default("env".to_string()),
            }
        }
    }

    impl Config for ServerConfig {
        fn register(&self, path: &str, registry: &mut Registry<Self>) {
            registry
                .format::<EnvFormat>()
                .variable(format!("{path}HOST"), field!(host))
                .variable(format!("{path}PORT"), field!(port))
                .vector(format!("{path}TAGS"), field!(tags))
                .variable(format!("{path}ENV_ONLY"), field!(env_only));
            registry
                .format::<JsonFormat>()
                .variable(format!("{path}/host"), field!(host))
                .variable(format!("{path}/port"), field!(port))
                .vector(format!("{path}/tags"), field!(tags))
                .variable(format!("{path}/debug"), field!(debug));
            #[cfg(feature = "toml")]
            registry
                .format::<crate::toml_format::TomlFormat>()
                .variable(format!("{path}.host"), field!(host))
                .variable(format!("{path}.port"), field!(port))
                .vector(format!("{path}.tags"), field!(tags))
                .variable(format!("{path}.debug"), field!(debug));
        }
    }

    #[test]
    fn fixtures_start_with_their_defaults() {
        let vars = VarsConfig::default();
        assert_eq!(vars.optional_int_var, 111);
        assert!(!vars.int_var.initialized());

        let nested = NestedConfig::default();
        assert!(!nested.var_config.optional());
        assert!(nested.var_config_opt.optional());
        assert_eq!(nested.opt_var_config.int_var, 300);

        let server = ServerConfig::default();
        assert_eq!(server.host, "localhost".to_string());
        assert!(!server.tags.initialized());
    }
}
