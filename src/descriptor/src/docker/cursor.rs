//! Fluent navigation over one instruction of a descriptor.
//!
//! A [`Cursor`] is handed out by the descriptor's accessors. It holds the
//! exclusive borrow of the descriptor together with the slot of the
//! instruction it edits, so setters can be chained and [`Cursor::up`]
//! returns to the descriptor:
//!
//! ```
//! use docker_descriptor::DockerDescriptor;
//!
//! let mut descriptor = DockerDescriptor::new();
//! descriptor
//!     .from()
//!     .name("rust:1.75")
//!     .alias("builder")
//!     .up()
//!     .run()
//!     .parameters(["cargo build --release"])
//!     .up();
//! assert_eq!(descriptor.len(), 2);
//! ```

use std::marker::PhantomData;

use super::descriptor::DockerDescriptor;
use super::factory;
use super::instruction::{
    AddInstruction, ArgInstruction, CmdInstruction, CommentInstruction, CopyInstruction,
    EntrypointInstruction, EnvInstruction, ExposeInstruction, FromInstruction, LabelInstruction,
    MaintainerInstruction, OnBuildInstruction, RunInstruction, UserInstruction, Variant,
    VolumeInstruction, WorkdirInstruction,
};

/// Location of an instruction inside a descriptor.
///
/// `depth` counts how many ONBUILD wrappers to descend through from the
/// top-level instruction at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub(crate) index: usize,
    pub(crate) depth: usize,
}

impl Slot {
    pub(crate) fn top(index: usize) -> Self {
        Self { index, depth: 0 }
    }

    fn nested(self) -> Self {
        Self {
            index: self.index,
            depth: self.depth + 1,
        }
    }
}

/// Editing handle for one instruction of type `T` inside a descriptor.
pub struct Cursor<'a, T> {
    descriptor: &'a mut DockerDescriptor,
    slot: Slot,
    marker: PhantomData<fn() -> T>,
}

impl<'a, T: Variant> Cursor<'a, T> {
    /// Bind a cursor to a slot that holds a `T`.
    pub(crate) fn new(descriptor: &'a mut DockerDescriptor, slot: Slot) -> Self {
        Self {
            descriptor,
            slot,
            marker: PhantomData,
        }
    }

    /// Return to the owning descriptor.
    pub fn up(self) -> &'a mut DockerDescriptor {
        self.descriptor
    }

    /// Read access to the instruction under the cursor.
    pub fn get(&self) -> &T {
        match self.descriptor.resolve(self.slot).and_then(T::project) {
            Some(record) => record,
            None => unreachable!("cursor slot holds a {}", T::KIND),
        }
    }

    /// Position of the (outermost) instruction in the descriptor's sequence.
    pub fn position(&self) -> usize {
        self.slot.index
    }

    /// Apply an arbitrary edit to the instruction under the cursor.
    pub fn edit(mut self, f: impl FnOnce(&mut T)) -> Self {
        f(self.target_mut());
        self
    }

    fn target_mut(&mut self) -> &mut T {
        match self.descriptor.resolve_mut(self.slot).and_then(T::project_mut) {
            Some(record) => record,
            None => unreachable!("cursor slot holds a {}", T::KIND),
        }
    }
}

impl<T: Variant + std::fmt::Debug> std::fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("slot", &self.slot)
            .field("instruction", self.get())
            .finish()
    }
}

impl<'a> Cursor<'a, FromInstruction> {
    /// Set the base image reference.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.edit(|from| {
            from.set_name(name);
        })
    }

    /// Set the build stage alias.
    pub fn alias(self, alias: impl Into<String>) -> Self {
        self.edit(|from| {
            from.set_alias(alias);
        })
    }
}

impl<'a> Cursor<'a, MaintainerInstruction> {
    /// Set the image author.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.edit(|maintainer| {
            maintainer.set_name(name);
        })
    }
}

impl<'a> Cursor<'a, VolumeInstruction> {
    /// Set the mount point.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.edit(|volume| {
            volume.set_name(name);
        })
    }
}

impl<'a> Cursor<'a, UserInstruction> {
    /// Set the user, optionally `user:group`.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.edit(|user| {
            user.set_name(name);
        })
    }
}

impl<'a> Cursor<'a, WorkdirInstruction> {
    /// Set the path.
    pub fn path(self, path: impl Into<String>) -> Self {
        self.edit(|workdir| {
            workdir.set_path(path);
        })
    }
}

impl<'a> Cursor<'a, RunInstruction> {
    /// Replace the parameters, keeping their order.
    pub fn parameters<I, S>(self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edit(|run| {
            run.set_parameters(parameters);
        })
    }
}

impl<'a> Cursor<'a, CmdInstruction> {
    /// Replace the parameters, keeping their order.
    pub fn parameters<I, S>(self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edit(|cmd| {
            cmd.set_parameters(parameters);
        })
    }
}

impl<'a> Cursor<'a, EntrypointInstruction> {
    /// Replace the parameters, keeping their order.
    pub fn parameters<I, S>(self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edit(|entrypoint| {
            entrypoint.set_parameters(parameters);
        })
    }
}

impl<'a> Cursor<'a, ExposeInstruction> {
    /// Replace the exposed ports, keeping their order.
    pub fn ports(self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.edit(|expose| {
            expose.set_ports(ports);
        })
    }
}

impl<'a> Cursor<'a, EnvInstruction> {
    /// Set the key.
    pub fn key(self, key: impl Into<String>) -> Self {
        self.edit(|env| {
            env.set_key(key);
        })
    }

    /// Set the value.
    pub fn value(self, value: impl Into<String>) -> Self {
        self.edit(|env| {
            env.set_value(value);
        })
    }
}

impl<'a> Cursor<'a, LabelInstruction> {
    /// Set the key.
    pub fn key(self, key: impl Into<String>) -> Self {
        self.edit(|label| {
            label.set_key(key);
        })
    }

    /// Set the value.
    pub fn value(self, value: impl Into<String>) -> Self {
        self.edit(|label| {
            label.set_value(value);
        })
    }
}

impl<'a> Cursor<'a, ArgInstruction> {
    /// Set the build argument name.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.edit(|arg| {
            arg.set_name(name);
        })
    }

    /// Set the default value.
    pub fn default_value(self, default: impl Into<String>) -> Self {
        self.edit(|arg| {
            arg.set_default_value(default);
        })
    }
}

impl<'a> Cursor<'a, AddInstruction> {
    /// Set the source path.
    pub fn source(self, source: impl Into<String>) -> Self {
        self.edit(|add| {
            add.set_source(source);
        })
    }

    /// Set the destination path.
    pub fn destination(self, destination: impl Into<String>) -> Self {
        self.edit(|add| {
            add.set_destination(destination);
        })
    }
}

impl<'a> Cursor<'a, CopyInstruction> {
    /// Set the source path.
    pub fn source(self, source: impl Into<String>) -> Self {
        self.edit(|copy| {
            copy.set_source(source);
        })
    }

    /// Set the destination path.
    pub fn destination(self, destination: impl Into<String>) -> Self {
        self.edit(|copy| {
            copy.set_destination(destination);
        })
    }

    /// Copy from a named build stage (`--from=`).
    pub fn from_stage(self, stage: impl Into<String>) -> Self {
        self.edit(|copy| {
            copy.set_from_stage(stage);
        })
    }
}

impl<'a> Cursor<'a, CommentInstruction> {
    /// Set the comment text.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.edit(|comment| {
            comment.set_text(text);
        })
    }
}

impl<'a> Cursor<'a, OnBuildInstruction> {
    /// Wrap a fresh `T` and move the cursor onto it.
    ///
    /// Any previously wrapped instruction is replaced.
    pub fn instruction<T: Variant>(self) -> Cursor<'a, T> {
        let slot = self.slot.nested();
        let cursor = self.edit(|onbuild| {
            onbuild.set_instruction(factory::create_variant::<T>());
        });
        Cursor::new(cursor.descriptor, slot)
    }
}
