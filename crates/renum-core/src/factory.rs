//! Enum type construction.
//!
//! [`EnumFactory::create`] runs a [`Declaration`] against a fresh registry and
//! publishes the result into a [`Namespace`]. Values are registered the moment
//! they are declared, so indices and duplicate checks follow declaration
//! order, but their fields are only resolved after the whole declaration body
//! has run. Fields, shared methods and the init hook may therefore be declared
//! before or after the values that use them.

use crate::config::FactoryConfig;
use crate::diagnostics::{ConsoleDiagnosticHandler, DiagnosticHandler};
use crate::dispatch::MethodTable;
use crate::error::{NameKind, Result};
use crate::field::{FieldDef, FieldSchema};
use crate::namespace::Namespace;
use crate::naming;
use crate::record::{EnumValue, InitArgs};
use crate::registry::{EnumType, Member, TypeData, TypeRegistry};
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs once per value after its fields are resolved
pub type InitHook = Arc<dyn Fn(&mut InitContext<'_>) -> Result<()> + Send + Sync>;

/// A declaration body
pub type BodyFn<'d> = Box<dyn FnOnce(&mut TypeBuilder<'_>) -> Result<()> + 'd>;

/// How the values of a new type are declared
pub enum Declaration<'d> {
    /// Plain value names, in order
    Names(Vec<String>),
    /// A body run against a [`TypeBuilder`]
    Body(BodyFn<'d>),
    /// A body followed by plain value names
    NamesWithBody { names: Vec<String>, body: BodyFn<'d> },
}

impl<'d> Declaration<'d> {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Declaration::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn body<F>(body: F) -> Self
    where
        F: FnOnce(&mut TypeBuilder<'_>) -> Result<()> + 'd,
    {
        Declaration::Body(Box::new(body))
    }

    /// The body runs first, then `names` are declared after whatever it declared
    pub fn names_with_body<I, S, F>(names: I, body: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(&mut TypeBuilder<'_>) -> Result<()> + 'd,
    {
        Declaration::NamesWithBody {
            names: names.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        }
    }
}

/// One value declaration: name, init arguments and instance-specific methods
#[derive(Debug, Clone)]
pub struct ValueDecl {
    name: String,
    args: InitArgs,
    overrides: MethodTable,
}

impl ValueDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: InitArgs::new(),
            overrides: MethodTable::new(),
        }
    }

    /// Append a positional init argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.positional.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.args
            .positional
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Set a field explicitly by name
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.keyed.insert(name.into(), value.into());
        self
    }

    /// Give this value its own implementation of `name`
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(Member<'_>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.overrides.define(name, method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for ValueDecl {
    fn from(name: &str) -> Self {
        ValueDecl::new(name)
    }
}

impl From<String> for ValueDecl {
    fn from(name: String) -> Self {
        ValueDecl::new(name)
    }
}

/// Passed to init hooks: the value being initialized and its declaration arguments
pub struct InitContext<'a> {
    owner: &'a TypeData,
    value: &'a mut EnumValue,
    args: &'a InitArgs,
}

impl InitContext<'_> {
    pub fn value(&self) -> &EnumValue {
        self.value
    }

    /// The value as a dispatchable member of its type
    pub fn member(&self) -> Member<'_> {
        Member::new(self.owner, self.value)
    }

    /// Call a method on the value being initialized
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.member().call(method, args)
    }

    pub fn name(&self) -> &str {
        self.value.name()
    }

    pub fn index(&self) -> usize {
        self.value.index()
    }

    pub fn args(&self) -> &[Value] {
        &self.args.positional
    }

    pub fn arg(&self, position: usize) -> Option<&Value> {
        self.args.positional.get(position)
    }

    pub fn keyed(&self, name: &str) -> Option<&Value> {
        self.args.keyed.get(name)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.value.field(name)
    }

    /// Overwrite a declared field
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.value.set_field(name, value.into())
    }
}

/// Collects the declarations of one enum type
pub struct TypeBuilder<'f> {
    registry: TypeRegistry,
    pending: Vec<InitArgs>,
    init_hook: Option<InitHook>,
    config: &'f FactoryConfig,
    diagnostics: &'f dyn DiagnosticHandler,
}

impl<'f> TypeBuilder<'f> {
    fn new(
        registry: TypeRegistry,
        config: &'f FactoryConfig,
        diagnostics: &'f dyn DiagnosticHandler,
    ) -> Self {
        Self {
            registry,
            pending: Vec::new(),
            init_hook: None,
            config,
            diagnostics,
        }
    }

    pub fn type_name(&self) -> &str {
        self.registry.name()
    }

    pub fn qualified_name(&self) -> &str {
        self.registry.qualified_name()
    }

    pub fn fields(&self) -> &FieldSchema {
        self.registry.fields()
    }

    /// Declare a field and its reader method. Redeclaring a field replaces it.
    pub fn field(&mut self, field: impl Into<FieldDef>) -> Result<()> {
        let field = field.into();
        naming::validate(NameKind::Field, field.name(), true)?;
        let name = field.name().to_string();

        if self.registry.fields_mut()?.declare(field).is_some() {
            self.diagnostics.warning(
                self.registry.qualified_name(),
                &format!("Field '{}' redeclared; the last declaration wins", name),
            );
        }

        let reader = name.clone();
        self.registry
            .shared_methods_mut()?
            .define(name, move |member, _| {
                Ok(member.field(&reader).cloned().unwrap_or_default())
            });
        Ok(())
    }

    /// Define a method shared by every value of the type
    pub fn method<F>(&mut self, name: &str, method: F) -> Result<()>
    where
        F: Fn(Member<'_>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        naming::validate(NameKind::Method, name, true)?;
        if self
            .registry
            .shared_methods_mut()?
            .define(name, method)
            .is_some()
        {
            debug!(type_name = %self.registry.qualified_name(), method = name, "Shared method redefined");
        }
        Ok(())
    }

    /// Set the hook run for each value after its fields are resolved
    pub fn init<F>(&mut self, hook: F)
    where
        F: Fn(&mut InitContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.init_hook = Some(Arc::new(hook));
    }

    /// Declare a value, returning its index
    pub fn value(&mut self, decl: impl Into<ValueDecl>) -> Result<usize> {
        let ValueDecl {
            name,
            args,
            overrides,
        } = decl.into();
        naming::validate(
            NameKind::Value,
            &name,
            self.config.naming.require_capitalized,
        )?;
        for method in overrides.names() {
            naming::validate(NameKind::Method, method, true)?;
        }

        let value = self.registry.new_value(&name).with_overrides(overrides);
        let index = self.registry.register(value)?;
        self.pending.push(args);
        Ok(index)
    }

    /// Declare several argument-less values
    pub fn values<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.value(ValueDecl::new(name))?;
        }
        Ok(())
    }

    /// Initialize every value in declaration order, then freeze the registry
    fn finish(self) -> Result<EnumType> {
        let TypeBuilder {
            mut registry,
            pending,
            init_hook,
            config,
            diagnostics,
        } = self;

        registry.init_values(&pending, |owner, value, args| {
            let ignored = value.init(owner, args, config.strict_fields, init_hook.is_some())?;
            for key in ignored {
                diagnostics.warning(
                    &value.to_string(),
                    &format!("Ignoring unknown field '{}'", key),
                );
            }
            if let Some(hook) = &init_hook {
                hook(&mut InitContext { owner, value, args })?;
            }
            Ok(())
        })?;

        Ok(registry.publish())
    }
}

/// Builds enum types with shared configuration and diagnostics
pub struct EnumFactory {
    config: Arc<FactoryConfig>,
    diagnostic_handler: Arc<dyn DiagnosticHandler>,
}

impl EnumFactory {
    /// Create a factory reporting diagnostics to stderr
    pub fn new(config: FactoryConfig) -> Self {
        let diagnostic_handler = Arc::new(ConsoleDiagnosticHandler::new(config.pretty));
        Self {
            config: Arc::new(config),
            diagnostic_handler,
        }
    }

    /// Create a factory with a custom diagnostic handler (for testing)
    pub fn with_dependencies(
        config: FactoryConfig,
        diagnostic_handler: Arc<dyn DiagnosticHandler>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            diagnostic_handler,
        }
    }

    pub fn config(&self) -> &Arc<FactoryConfig> {
        &self.config
    }

    pub fn diagnostic_handler(&self) -> &Arc<dyn DiagnosticHandler> {
        &self.diagnostic_handler
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostic_handler.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostic_handler.error_count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostic_handler.warning_count()
    }

    /// Build `type_name` from `declaration` and publish it into `namespace`.
    ///
    /// Nothing is published when the declaration fails.
    pub fn create(
        &self,
        namespace: &mut Namespace,
        type_name: &str,
        declaration: Declaration<'_>,
    ) -> Result<EnumType> {
        let enum_type = match self.build(namespace, type_name, declaration) {
            Ok(enum_type) => enum_type,
            Err(err) => {
                self.diagnostic_handler
                    .error(&namespace.qualify(type_name), &err.to_string());
                return Err(err);
            }
        };

        namespace.insert(enum_type.clone())?;
        info!(
            type_name = %enum_type.qualified_name(),
            values = enum_type.len(),
            "Created enum"
        );
        Ok(enum_type)
    }

    fn build(
        &self,
        namespace: &Namespace,
        type_name: &str,
        declaration: Declaration<'_>,
    ) -> Result<EnumType> {
        naming::validate(
            NameKind::Type,
            type_name,
            self.config.naming.require_capitalized,
        )?;
        namespace.ensure_available(type_name)?;

        let mut registry = TypeRegistry::new(type_name, namespace.qualify(type_name));
        registry.set_fuzzy_lookup(self.config.fuzzy_lookup);
        let mut builder = TypeBuilder::new(registry, &self.config, self.diagnostic_handler.as_ref());

        match declaration {
            Declaration::Names(names) => builder.values(names)?,
            Declaration::Body(body) => body(&mut builder)?,
            Declaration::NamesWithBody { names, body } => {
                body(&mut builder)?;
                builder.values(names)?;
            }
        }

        builder.finish()
    }
}

impl Default for EnumFactory {
    fn default() -> Self {
        Self::new(FactoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnosticHandler;
    use crate::error::EnumError;

    fn factory() -> (EnumFactory, Arc<CollectingDiagnosticHandler>) {
        let diagnostics = Arc::new(CollectingDiagnosticHandler::new());
        let factory = EnumFactory::with_dependencies(FactoryConfig::default(), diagnostics.clone());
        (factory, diagnostics)
    }

    #[test]
    fn test_create_from_names() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let status = factory
            .create(
                &mut ns,
                "Status",
                Declaration::names(["NOT_STARTED", "IN_PROGRESS", "COMPLETE"]),
            )
            .unwrap();

        assert_eq!(status.len(), 3);
        assert_eq!(ns.get("Status"), Some(&status));
    }

    #[test]
    fn test_duplicate_value_is_fatal() {
        let (factory, diagnostics) = factory();
        let mut ns = Namespace::root();
        let err = factory
            .create(&mut ns, "Color", Declaration::names(["RED", "RED"]))
            .unwrap_err();

        assert!(matches!(err, EnumError::DuplicateName { .. }));
        assert!(ns.get("Color").is_none());
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_invalid_value_name() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let err = factory
            .create(
                &mut ns,
                "Size",
                Declaration::body(|b| {
                    b.value("Extra Large")?;
                    Ok(())
                }),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            EnumError::InvalidName {
                kind: NameKind::Value,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_type_name() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let err = factory
            .create(&mut ns, "status", Declaration::names(["A"]))
            .unwrap_err();
        assert!(matches!(
            err,
            EnumError::InvalidName {
                kind: NameKind::Type,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_type_in_namespace() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        factory
            .create(&mut ns, "Status", Declaration::names(["A"]))
            .unwrap();
        let err = factory
            .create(&mut ns, "Status", Declaration::names(["B"]))
            .unwrap_err();

        assert!(matches!(err, EnumError::DuplicateType { .. }));
        assert_eq!(ns.get("Status").unwrap().first().unwrap().name(), "A");
    }

    #[test]
    fn test_fields_declared_after_values_apply() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let size = factory
            .create(
                &mut ns,
                "Size",
                Declaration::body(|b| {
                    b.value(ValueDecl::new("Small").arg("Really really tiny"))?;
                    b.value("Unknown")?;
                    b.field(FieldDef::new("description").with_default_fn(|_| {
                        Ok(Value::from("NO DESCRIPTION GIVEN"))
                    }))?;
                    Ok(())
                }),
            )
            .unwrap();

        let small = size.by_exact_name("Small").unwrap();
        assert_eq!(small.field("description"), Some(&Value::from("Really really tiny")));
        let unknown = size.by_exact_name("Unknown").unwrap();
        assert_eq!(
            unknown.call("description", &[]).unwrap(),
            Value::from("NO DESCRIPTION GIVEN")
        );
    }

    #[test]
    fn test_field_redeclaration_warns() {
        let (factory, diagnostics) = factory();
        let mut ns = Namespace::root();
        let foo = factory
            .create(
                &mut ns,
                "Foo",
                Declaration::body(|b| {
                    b.field(FieldDef::new("bar").with_default(1))?;
                    b.field(FieldDef::new("bar").with_default(2))?;
                    b.value("Baz")?;
                    Ok(())
                }),
            )
            .unwrap();

        assert_eq!(foo.first().unwrap().field("bar"), Some(&Value::Int(2)));
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_names_with_body_runs_body_first() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let color = factory
            .create(
                &mut ns,
                "Color",
                Declaration::names_with_body(["GREEN", "BLUE"], |b| {
                    b.value("RED")?;
                    b.method("abbr", |member, _| Ok(Value::from(&member.name()[..1])))
                }),
            )
            .unwrap();

        let names: Vec<_> = color.iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["RED", "GREEN", "BLUE"]);
        assert_eq!(
            color.by_index(2).unwrap().call("abbr", &[]).unwrap(),
            Value::from("B")
        );
    }

    #[test]
    fn test_init_hook_sees_arguments() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let planet = factory
            .create(
                &mut ns,
                "Planet",
                Declaration::body(|b| {
                    b.field("mass")?;
                    b.field("label")?;
                    b.value(ValueDecl::new("Earth").arg(5.976e24).arg("home").arg("extra"))?;
                    b.init(|ctx| {
                        let label = format!("{}#{}:{}", ctx.name(), ctx.index(), ctx.args().len());
                        ctx.set_field("label", label)
                    });
                    Ok(())
                }),
            )
            .unwrap();

        let earth = planet.first().unwrap();
        assert_eq!(earth.field("mass"), Some(&Value::Float(5.976e24)));
        assert_eq!(earth.field("label"), Some(&Value::from("Earth#0:3")));
    }

    #[test]
    fn test_init_hook_dispatches_on_value() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let planet = factory
            .create(
                &mut ns,
                "Planet",
                Declaration::body(|b| {
                    b.field(FieldDef::new("mass").with_default(1.0))?;
                    b.field("summary")?;
                    b.value(ValueDecl::new("Earth").field("summary", "home"))?;
                    b.value("Mars")?;
                    b.method("weight", |member, _| {
                        let mass = member.call("mass", &[])?.as_float().unwrap_or(0.0);
                        Ok(Value::Float(mass * 9.8))
                    })?;
                    b.init(|ctx| {
                        let weight = ctx.call("weight", &[])?;
                        let summary = match ctx.keyed("summary") {
                            Some(given) => format!("{} ({})", given.as_str().unwrap_or_default(), weight),
                            None => weight.to_string(),
                        };
                        assert_eq!(ctx.member().index(), ctx.index());
                        ctx.set_field("summary", summary)
                    });
                    Ok(())
                }),
            )
            .unwrap();

        assert_eq!(
            planet.with_name("Earth").unwrap().field("summary"),
            Some(&Value::from("home (9.8)"))
        );
        assert_eq!(
            planet.with_name("Mars").unwrap().field("summary"),
            Some(&Value::from("9.8"))
        );
    }

    #[test]
    fn test_init_hook_cannot_invent_fields() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let err = factory
            .create(
                &mut ns,
                "Planet",
                Declaration::body(|b| {
                    b.value("Earth")?;
                    b.init(|ctx| ctx.set_field("mass", 1));
                    Ok(())
                }),
            )
            .unwrap_err();
        assert!(matches!(err, EnumError::UnknownField { .. }));
    }

    #[test]
    fn test_lenient_fields_warn() {
        let diagnostics = Arc::new(CollectingDiagnosticHandler::new());
        let config = FactoryConfig {
            strict_fields: false,
            ..FactoryConfig::default()
        };
        let factory = EnumFactory::with_dependencies(config, diagnostics.clone());
        let mut ns = Namespace::root();
        let foo = factory
            .create(
                &mut ns,
                "Foo",
                Declaration::body(|b| {
                    b.field("foo")?;
                    b.value(ValueDecl::new("Baz").field("foo", 1).field("color", "red"))?;
                    Ok(())
                }),
            )
            .unwrap();

        assert_eq!(foo.first().unwrap().field("foo"), Some(&Value::Int(1)));
        let warnings = diagnostics.get_diagnostics();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].subject, "Foo::Baz");
        assert!(warnings[0].message.contains("color"));
    }

    #[test]
    fn test_lowercase_names_allowed_when_configured() {
        let diagnostics = Arc::new(CollectingDiagnosticHandler::new());
        let mut config = FactoryConfig::default();
        config.naming.require_capitalized = false;
        let factory = EnumFactory::with_dependencies(config, diagnostics);
        let mut ns = Namespace::root();

        let mode = factory
            .create(&mut ns, "mode", Declaration::names(["fast", "slow"]))
            .unwrap();
        assert_eq!(mode.with_name("slow").unwrap().index(), 1);
    }

    #[test]
    fn test_body_can_read_local_state() {
        let (factory, _) = factory();
        let mut ns = Namespace::root();
        let prefix = String::from("Level");
        let levels = factory
            .create(
                &mut ns,
                "Level",
                Declaration::body(|b| {
                    for n in 1..=3 {
                        b.value(format!("{}{}", prefix, n))?;
                    }
                    Ok(())
                }),
            )
            .unwrap();

        assert_eq!(levels.last().unwrap().name(), "Level3");
    }
}
