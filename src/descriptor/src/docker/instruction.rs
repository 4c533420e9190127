//! Dockerfile instruction records.
//!
//! Each kind has its own record with kind-specific fields. Records can be
//! built standalone (for [`DockerDescriptor::add_instruction`]) or edited in
//! place through a [`Cursor`] handed out by the descriptor.
//!
//! [`DockerDescriptor::add_instruction`]: super::DockerDescriptor::add_instruction
//! [`Cursor`]: super::Cursor

use serde::{Deserialize, Serialize};

use super::kind::InstructionKind;

mod sealed {
    pub trait Sealed {}
}

/// Typed view over one [`Instruction`] variant.
///
/// Lets the descriptor create, find and remove instructions by record type.
/// Implemented only for the records in this module; cursors rely on `KIND`,
/// `Into<Instruction>` and the projections agreeing.
///
/// ```compile_fail
/// use docker_descriptor::{CmdInstruction, Instruction, InstructionKind, Variant};
///
/// #[derive(Default)]
/// struct Custom;
///
/// impl From<Custom> for Instruction {
///     fn from(_: Custom) -> Self {
///         CmdInstruction::default().into()
///     }
/// }
///
/// impl Variant for Custom {
///     const KIND: InstructionKind = InstructionKind::Cmd;
///
///     fn project(_: &Instruction) -> Option<&Self> {
///         None
///     }
///
///     fn project_mut(_: &mut Instruction) -> Option<&mut Self> {
///         None
///     }
/// }
/// ```
pub trait Variant: sealed::Sealed + Default + Into<Instruction> {
    /// Kind tag of this record.
    const KIND: InstructionKind;

    /// Borrow the record if `instruction` is of this kind.
    fn project(instruction: &Instruction) -> Option<&Self>;

    /// Mutably borrow the record if `instruction` is of this kind.
    fn project_mut(instruction: &mut Instruction) -> Option<&mut Self>;
}

macro_rules! instructions {
    ($($kind:ident($record:ident)),* $(,)?) => {
        /// A single Dockerfile instruction.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind", rename_all = "snake_case")]
        pub enum Instruction {
            $($kind($record),)*
        }

        impl Instruction {
            /// Kind tag of this instruction.
            pub fn kind(&self) -> InstructionKind {
                match self {
                    $(Self::$kind(_) => InstructionKind::$kind,)*
                }
            }
        }

        $(
            impl From<$record> for Instruction {
                fn from(record: $record) -> Self {
                    Instruction::$kind(record)
                }
            }

            impl sealed::Sealed for $record {}

            impl Variant for $record {
                const KIND: InstructionKind = InstructionKind::$kind;

                fn project(instruction: &Instruction) -> Option<&Self> {
                    match instruction {
                        Instruction::$kind(record) => Some(record),
                        _ => None,
                    }
                }

                fn project_mut(instruction: &mut Instruction) -> Option<&mut Self> {
                    match instruction {
                        Instruction::$kind(record) => Some(record),
                        _ => None,
                    }
                }
            }
        )*
    };
}

instructions! {
    From(FromInstruction),
    Maintainer(MaintainerInstruction),
    Run(RunInstruction),
    Cmd(CmdInstruction),
    Expose(ExposeInstruction),
    Env(EnvInstruction),
    Add(AddInstruction),
    Copy(CopyInstruction),
    Entrypoint(EntrypointInstruction),
    Volume(VolumeInstruction),
    User(UserInstruction),
    Workdir(WorkdirInstruction),
    OnBuild(OnBuildInstruction),
    Comment(CommentInstruction),
    Label(LabelInstruction),
    Arg(ArgInstruction),
}

impl Instruction {
    /// Dockerfile keyword of this instruction.
    pub fn keyword(&self) -> &'static str {
        self.kind().keyword()
    }

    /// Typed view of this instruction, if it is a `T`.
    pub fn as_variant<T: Variant>(&self) -> Option<&T> {
        T::project(self)
    }
}

fn collect_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

// --- Single-name records ---

/// `FROM <image> [AS <alias>]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromInstruction {
    name: Option<String>,
    alias: Option<String>,
}

impl FromInstruction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            alias: None,
        }
    }

    /// Base image reference.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Build stage alias (`AS <alias>`).
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }
}

/// `MAINTAINER <name>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintainerInstruction {
    name: Option<String>,
}

impl MaintainerInstruction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }
}

/// `VOLUME <name>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInstruction {
    name: Option<String>,
}

impl VolumeInstruction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Mount point inside the image.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }
}

/// `USER <user>[:<group>]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInstruction {
    name: Option<String>,
}

impl UserInstruction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }
}

/// `WORKDIR <path>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdirInstruction {
    path: Option<String>,
}

impl WorkdirInstruction {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = Some(path.into());
        self
    }
}

// --- Parameter-list records ---

/// `RUN <command>` or `RUN ["exec", "form"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInstruction {
    parameters: Vec<String>,
}

impl RunInstruction {
    pub fn new<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: collect_strings(parameters),
        }
    }

    /// Parameters in argument order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Replace the parameters, preserving argument order.
    pub fn set_parameters<I, S>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = collect_strings(parameters);
        self
    }
}

/// `CMD <command>` or `CMD ["exec", "form"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmdInstruction {
    parameters: Vec<String>,
}

impl CmdInstruction {
    pub fn new<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: collect_strings(parameters),
        }
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn set_parameters<I, S>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = collect_strings(parameters);
        self
    }
}

/// `ENTRYPOINT <command>` or `ENTRYPOINT ["exec", "form"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrypointInstruction {
    parameters: Vec<String>,
}

impl EntrypointInstruction {
    pub fn new<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: collect_strings(parameters),
        }
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn set_parameters<I, S>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = collect_strings(parameters);
        self
    }
}

/// `EXPOSE <port>...`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposeInstruction {
    ports: Vec<u16>,
}

impl ExposeInstruction {
    pub fn new(ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            ports: ports.into_iter().collect(),
        }
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn set_ports(&mut self, ports: impl IntoIterator<Item = u16>) -> &mut Self {
        self.ports = ports.into_iter().collect();
        self
    }
}

// --- Key/value records ---

/// `ENV <key>=<value>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvInstruction {
    key: Option<String>,
    value: Option<String>,
}

impl EnvInstruction {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = Some(key.into());
        self
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.value = Some(value.into());
        self
    }
}

/// `LABEL <key>=<value>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInstruction {
    key: Option<String>,
    value: Option<String>,
}

impl LabelInstruction {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = Some(key.into());
        self
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.value = Some(value.into());
        self
    }
}

/// `ARG <name>[=<default>]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgInstruction {
    name: Option<String>,
    default: Option<String>,
}

impl ArgInstruction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            default: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Default value used when no build argument overrides it.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_default_value(&mut self, default: impl Into<String>) -> &mut Self {
        self.default = Some(default.into());
        self
    }
}

// --- Source/destination records ---

/// `ADD <src> <dst>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddInstruction {
    source: Option<String>,
    destination: Option<String>,
}

impl AddInstruction {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            destination: Some(destination.into()),
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn set_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.source = Some(source.into());
        self
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) -> &mut Self {
        self.destination = Some(destination.into());
        self
    }
}

/// `COPY [--from=<stage>] <src> <dst>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyInstruction {
    source: Option<String>,
    destination: Option<String>,
    from_stage: Option<String>,
}

impl CopyInstruction {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            destination: Some(destination.into()),
            from_stage: None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Build stage to copy from (`--from=<stage>`).
    pub fn from_stage(&self) -> Option<&str> {
        self.from_stage.as_deref()
    }

    pub fn set_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.source = Some(source.into());
        self
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) -> &mut Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn set_from_stage(&mut self, stage: impl Into<String>) -> &mut Self {
        self.from_stage = Some(stage.into());
        self
    }
}

// --- Wrappers ---

/// `ONBUILD <instruction>`
///
/// Wraps another instruction that runs when the image is used as a base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnBuildInstruction {
    instruction: Option<Box<Instruction>>,
}

impl OnBuildInstruction {
    pub fn new(instruction: impl Into<Instruction>) -> Self {
        Self {
            instruction: Some(Box::new(instruction.into())),
        }
    }

    /// The wrapped instruction, if one has been set.
    pub fn instruction(&self) -> Option<&Instruction> {
        self.instruction.as_deref()
    }

    /// Typed view of the wrapped instruction.
    pub fn nested<T: Variant>(&self) -> Option<&T> {
        self.instruction().and_then(T::project)
    }

    pub fn set_instruction(&mut self, instruction: impl Into<Instruction>) -> &mut Self {
        self.instruction = Some(Box::new(instruction.into()));
        self
    }

    pub(crate) fn instruction_mut(&mut self) -> Option<&mut Instruction> {
        self.instruction.as_deref_mut()
    }
}

/// `# <text>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInstruction {
    text: Option<String>,
}

impl CommentInstruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }
}
