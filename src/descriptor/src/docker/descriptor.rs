//! Dockerfile descriptor.
//!
//! An ordered sequence of instructions. Insertion order is the emitted line
//! order and is never changed implicitly.
//!
//! Accessors follow the cardinality of their kind:
//!
//! - Singleton kinds (FROM, MAINTAINER, CMD, ENTRYPOINT, USER): `from()`
//!   returns the first existing instruction or appends a new one;
//!   `set_from(..)` edits it and returns the descriptor; `get_from()` never
//!   creates; `remove_from()` removes every instance.
//! - Multi kinds: `run()` always appends; `push_run(..)` appends and returns
//!   the descriptor; `get_all_run()` collects in order; `remove_all_run()`
//!   removes every instance.

use std::io::Write;

use docker_descriptor_core::error::{DescriptorError, Result};

use super::cursor::{Cursor, Slot};
use super::export::{DockerfileExporter, Exporter};
use super::factory;
use super::instruction::{
    AddInstruction, ArgInstruction, CmdInstruction, CommentInstruction, CopyInstruction,
    EntrypointInstruction, EnvInstruction, ExposeInstruction, FromInstruction, Instruction,
    LabelInstruction, MaintainerInstruction, OnBuildInstruction, RunInstruction, UserInstruction,
    Variant, VolumeInstruction, WorkdirInstruction,
};
use super::kind::InstructionKind;

/// Name reported by [`DockerDescriptor::descriptor_name`].
pub const DESCRIPTOR_NAME: &str = "Dockerfile";

/// In-memory Dockerfile: an ordered list of instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DockerDescriptor {
    instructions: Vec<Instruction>,
    /// Raw text supplied at construction. Stored, never parsed.
    content: Option<String>,
}

impl DockerDescriptor {
    /// Create an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty descriptor that retains `content` as its raw source.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            instructions: Vec::new(),
            content: Some(content.into()),
        }
    }

    /// Raw text supplied at construction, if any.
    pub fn raw_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// File name a rendered descriptor is conventionally saved under.
    pub fn descriptor_name(&self) -> &'static str {
        DESCRIPTOR_NAME
    }

    /// All instructions in sequence order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over the instructions in sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Number of top-level instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the descriptor holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Append any instruction verbatim, ignoring the cardinality policy.
    pub fn add_instruction(&mut self, instruction: impl Into<Instruction>) -> &mut Self {
        let instruction = instruction.into();
        let kind = instruction.kind();
        if kind.is_singleton() && self.find_first(kind).is_some() {
            tracing::warn!(
                instruction = kind.keyword(),
                "Appending a second instance of a singleton instruction"
            );
        }
        self.instructions.push(instruction);
        self
    }

    // --- Generic query engine ---

    /// First instruction of `kind`, scanning in order.
    pub fn find_first(&self, kind: InstructionKind) -> Option<&Instruction> {
        self.instructions.iter().find(|i| i.kind() == kind)
    }

    /// Every instruction of `kind`, in order, as a fresh vector.
    pub fn find_all(&self, kind: InstructionKind) -> Vec<&Instruction> {
        self.instructions
            .iter()
            .filter(|i| i.kind() == kind)
            .collect()
    }

    /// Remove every instruction of `kind`, keeping the order of the rest.
    pub fn remove_all(&mut self, kind: InstructionKind) -> &mut Self {
        let before = self.instructions.len();
        self.instructions.retain(|i| i.kind() != kind);
        let removed = before - self.instructions.len();
        if removed > 0 {
            tracing::debug!(
                instruction = kind.keyword(),
                removed,
                remaining = self.instructions.len(),
                "Removed instructions"
            );
        }
        self
    }

    /// First record of type `T`.
    pub fn first<T: Variant>(&self) -> Option<&T> {
        self.instructions.iter().find_map(T::project)
    }

    /// Every record of type `T`, in order, as a fresh vector.
    pub fn all<T: Variant>(&self) -> Vec<&T> {
        self.instructions.iter().filter_map(T::project).collect()
    }

    /// Remove every record of type `T`.
    pub fn remove<T: Variant>(&mut self) -> &mut Self {
        self.remove_all(T::KIND)
    }

    // --- Cursor plumbing ---

    fn append(&mut self, instruction: Instruction) -> usize {
        let index = self.instructions.len();
        tracing::debug!(
            instruction = instruction.keyword(),
            position = index,
            "Created instruction"
        );
        self.instructions.push(instruction);
        index
    }

    /// Get-or-create accessor for singleton kinds.
    fn singleton<T: Variant>(&mut self) -> Cursor<'_, T> {
        let existing = self.instructions.iter().position(|i| i.kind() == T::KIND);
        let index = match existing {
            Some(index) => index,
            None => self.append(factory::create_variant::<T>()),
        };
        Cursor::new(self, Slot::top(index))
    }

    /// Always-create accessor for multi kinds.
    fn append_new<T: Variant>(&mut self) -> Cursor<'_, T> {
        let index = self.append(factory::create_variant::<T>());
        Cursor::new(self, Slot::top(index))
    }

    pub(crate) fn resolve(&self, slot: Slot) -> Option<&Instruction> {
        let mut current = self.instructions.get(slot.index)?;
        for _ in 0..slot.depth {
            current = match current {
                Instruction::OnBuild(onbuild) => onbuild.instruction()?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub(crate) fn resolve_mut(&mut self, slot: Slot) -> Option<&mut Instruction> {
        let mut current = self.instructions.get_mut(slot.index)?;
        for _ in 0..slot.depth {
            current = match current {
                Instruction::OnBuild(onbuild) => onbuild.instruction_mut()?,
                _ => return None,
            };
        }
        Some(current)
    }

    // --- FROM (singleton) ---

    /// The FROM instruction, created and appended on first access.
    pub fn from(&mut self) -> Cursor<'_, FromInstruction> {
        self.singleton()
    }

    /// Set the base image, reusing the existing FROM.
    pub fn set_from(&mut self, name: impl Into<String>) -> &mut Self {
        self.from().name(name).up()
    }

    /// The FROM instruction, if one exists.
    pub fn get_from(&self) -> Option<&FromInstruction> {
        self.first()
    }

    /// Remove the FROM instruction.
    pub fn remove_from(&mut self) -> &mut Self {
        self.remove::<FromInstruction>()
    }

    // --- MAINTAINER (singleton) ---

    /// The MAINTAINER instruction, created and appended on first access.
    pub fn maintainer(&mut self) -> Cursor<'_, MaintainerInstruction> {
        self.singleton()
    }

    /// Set the MAINTAINER instruction, reusing the existing one.
    pub fn set_maintainer(&mut self, name: impl Into<String>) -> &mut Self {
        self.maintainer().name(name).up()
    }

    /// The MAINTAINER instruction, if one exists.
    pub fn get_maintainer(&self) -> Option<&MaintainerInstruction> {
        self.first()
    }

    /// Remove the MAINTAINER instruction.
    pub fn remove_maintainer(&mut self) -> &mut Self {
        self.remove::<MaintainerInstruction>()
    }

    // --- CMD (singleton) ---

    /// The CMD instruction, created and appended on first access.
    pub fn cmd(&mut self) -> Cursor<'_, CmdInstruction> {
        self.singleton()
    }

    /// Set the CMD instruction, reusing the existing one.
    pub fn set_cmd<I, S>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cmd().parameters(parameters).up()
    }

    /// The CMD instruction, if one exists.
    pub fn get_cmd(&self) -> Option<&CmdInstruction> {
        self.first()
    }

    /// Remove the CMD instruction.
    pub fn remove_cmd(&mut self) -> &mut Self {
        self.remove::<CmdInstruction>()
    }

    // --- ENTRYPOINT (singleton) ---

    /// The ENTRYPOINT instruction, created and appended on first access.
    pub fn entrypoint(&mut self) -> Cursor<'_, EntrypointInstruction> {
        self.singleton()
    }

    /// Set the ENTRYPOINT instruction, reusing the existing one.
    pub fn set_entrypoint<I, S>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoint().parameters(parameters).up()
    }

    /// The ENTRYPOINT instruction, if one exists.
    pub fn get_entrypoint(&self) -> Option<&EntrypointInstruction> {
        self.first()
    }

    /// Remove the ENTRYPOINT instruction.
    pub fn remove_entrypoint(&mut self) -> &mut Self {
        self.remove::<EntrypointInstruction>()
    }

    // --- USER (singleton) ---

    /// The USER instruction, created and appended on first access.
    pub fn user(&mut self) -> Cursor<'_, UserInstruction> {
        self.singleton()
    }

    /// Set the USER instruction, reusing the existing one.
    pub fn set_user(&mut self, name: impl Into<String>) -> &mut Self {
        self.user().name(name).up()
    }

    /// The USER instruction, if one exists.
    pub fn get_user(&self) -> Option<&UserInstruction> {
        self.first()
    }

    /// Remove the USER instruction.
    pub fn remove_user(&mut self) -> &mut Self {
        self.remove::<UserInstruction>()
    }

    // --- RUN ---

    /// Append a new, empty RUN instruction.
    pub fn run(&mut self) -> Cursor<'_, RunInstruction> {
        self.append_new()
    }

    /// Append a RUN with the given parameters.
    pub fn push_run<I, S>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run().parameters(parameters).up()
    }

    /// Every RUN instruction, in sequence order.
    pub fn get_all_run(&self) -> Vec<&RunInstruction> {
        self.all()
    }

    /// Remove every RUN instruction.
    pub fn remove_all_run(&mut self) -> &mut Self {
        self.remove::<RunInstruction>()
    }

    // --- EXPOSE ---

    /// Append a new, empty EXPOSE instruction.
    pub fn expose(&mut self) -> Cursor<'_, ExposeInstruction> {
        self.append_new()
    }

    /// Append a EXPOSE instruction.
    pub fn push_expose(&mut self, ports: impl IntoIterator<Item = u16>) -> &mut Self {
        self.expose().ports(ports).up()
    }

    /// Every EXPOSE instruction, in sequence order.
    pub fn get_all_expose(&self) -> Vec<&ExposeInstruction> {
        self.all()
    }

    /// Remove every EXPOSE instruction.
    pub fn remove_all_expose(&mut self) -> &mut Self {
        self.remove::<ExposeInstruction>()
    }

    // --- ENV ---

    /// Append a new, empty ENV instruction.
    pub fn env(&mut self) -> Cursor<'_, EnvInstruction> {
        self.append_new()
    }

    /// Append a ENV instruction.
    pub fn push_env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env().key(key).value(value).up()
    }

    /// Every ENV instruction, in sequence order.
    pub fn get_all_env(&self) -> Vec<&EnvInstruction> {
        self.all()
    }

    /// Remove every ENV instruction.
    pub fn remove_all_env(&mut self) -> &mut Self {
        self.remove::<EnvInstruction>()
    }

    // --- ADD ---

    /// Append a new, empty ADD instruction.
    pub fn add(&mut self) -> Cursor<'_, AddInstruction> {
        self.append_new()
    }

    /// Append a ADD instruction.
    pub fn push_add(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> &mut Self {
        self.add().source(source).destination(destination).up()
    }

    /// Every ADD instruction, in sequence order.
    pub fn get_all_add(&self) -> Vec<&AddInstruction> {
        self.all()
    }

    /// Remove every ADD instruction.
    pub fn remove_all_add(&mut self) -> &mut Self {
        self.remove::<AddInstruction>()
    }

    // --- COPY ---

    /// Append a new, empty COPY instruction.
    pub fn copy(&mut self) -> Cursor<'_, CopyInstruction> {
        self.append_new()
    }

    /// Append a COPY instruction.
    pub fn push_copy(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> &mut Self {
        self.copy().source(source).destination(destination).up()
    }

    /// Every COPY instruction, in sequence order.
    pub fn get_all_copy(&self) -> Vec<&CopyInstruction> {
        self.all()
    }

    /// Remove every COPY instruction.
    pub fn remove_all_copy(&mut self) -> &mut Self {
        self.remove::<CopyInstruction>()
    }

    // --- VOLUME ---

    /// Append a new, empty VOLUME instruction.
    pub fn volume(&mut self) -> Cursor<'_, VolumeInstruction> {
        self.append_new()
    }

    /// Append a VOLUME instruction.
    pub fn push_volume(&mut self, name: impl Into<String>) -> &mut Self {
        self.volume().name(name).up()
    }

    /// Every VOLUME instruction, in sequence order.
    pub fn get_all_volume(&self) -> Vec<&VolumeInstruction> {
        self.all()
    }

    /// Remove every VOLUME instruction.
    pub fn remove_all_volume(&mut self) -> &mut Self {
        self.remove::<VolumeInstruction>()
    }

    // --- WORKDIR ---

    /// Append a new, empty WORKDIR instruction.
    pub fn workdir(&mut self) -> Cursor<'_, WorkdirInstruction> {
        self.append_new()
    }

    /// Append a WORKDIR instruction.
    pub fn push_workdir(&mut self, path: impl Into<String>) -> &mut Self {
        self.workdir().path(path).up()
    }

    /// Every WORKDIR instruction, in sequence order.
    pub fn get_all_workdir(&self) -> Vec<&WorkdirInstruction> {
        self.all()
    }

    /// Remove every WORKDIR instruction.
    pub fn remove_all_workdir(&mut self) -> &mut Self {
        self.remove::<WorkdirInstruction>()
    }

    // --- ONBUILD ---

    /// Append a new, empty ONBUILD instruction.
    pub fn on_build(&mut self) -> Cursor<'_, OnBuildInstruction> {
        self.append_new()
    }

    /// Append an ONBUILD wrapping a fresh `T` and return a cursor at the
    /// wrapped instruction.
    pub fn on_build_instruction<T: Variant>(&mut self) -> Cursor<'_, T> {
        self.on_build().instruction::<T>()
    }

    /// Every ONBUILD instruction, in sequence order.
    pub fn get_all_on_build(&self) -> Vec<&OnBuildInstruction> {
        self.all()
    }

    /// Remove every ONBUILD instruction.
    pub fn remove_all_on_build(&mut self) -> &mut Self {
        self.remove::<OnBuildInstruction>()
    }

    // --- Comment ---

    /// Append a new, empty comment instruction.
    pub fn comment(&mut self) -> Cursor<'_, CommentInstruction> {
        self.append_new()
    }

    /// Append a comment instruction.
    pub fn push_comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.comment().text(text).up()
    }

    /// Every comment instruction, in sequence order.
    pub fn get_all_comment(&self) -> Vec<&CommentInstruction> {
        self.all()
    }

    /// Remove every comment instruction.
    pub fn remove_all_comment(&mut self) -> &mut Self {
        self.remove::<CommentInstruction>()
    }

    // --- LABEL ---

    /// Append a new, empty LABEL instruction.
    pub fn label(&mut self) -> Cursor<'_, LabelInstruction> {
        self.append_new()
    }

    /// Append a LABEL instruction.
    pub fn push_label(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.label().key(key).value(value).up()
    }

    /// Every LABEL instruction, in sequence order.
    pub fn get_all_label(&self) -> Vec<&LabelInstruction> {
        self.all()
    }

    /// Remove every LABEL instruction.
    pub fn remove_all_label(&mut self) -> &mut Self {
        self.remove::<LabelInstruction>()
    }

    // --- ARG ---

    /// Append a new, empty ARG instruction.
    pub fn arg(&mut self) -> Cursor<'_, ArgInstruction> {
        self.append_new()
    }

    /// Append a ARG instruction.
    pub fn push_arg(&mut self, name: impl Into<String>) -> &mut Self {
        self.arg().name(name).up()
    }

    /// Every ARG instruction, in sequence order.
    pub fn get_all_arg(&self) -> Vec<&ArgInstruction> {
        self.all()
    }

    /// Remove every ARG instruction.
    pub fn remove_all_arg(&mut self) -> &mut Self {
        self.remove::<ArgInstruction>()
    }

    // --- Export ---

    /// Render this descriptor as Dockerfile text into `sink`.
    ///
    /// Fails with [`DescriptorError::InvalidArgument`] when `sink` is absent,
    /// in which case nothing is written.
    pub fn export_to(&self, sink: Option<&mut dyn Write>) -> Result<()> {
        self.export_with(&DockerfileExporter::default(), sink)
    }

    /// Like [`export_to`](Self::export_to) with an injected exporter.
    pub fn export_with(&self, exporter: &dyn Exporter, sink: Option<&mut dyn Write>) -> Result<()> {
        let Some(sink) = sink else {
            return Err(DescriptorError::InvalidArgument(
                "Can not export to an absent sink".to_string(),
            ));
        };
        exporter.render(self, sink)
    }

    /// Render this descriptor as Dockerfile text.
    pub fn export_as_string(&self) -> Result<String> {
        DockerfileExporter::default().render_to_string(self)
    }
}

impl<'a> IntoIterator for &'a DockerDescriptor {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
