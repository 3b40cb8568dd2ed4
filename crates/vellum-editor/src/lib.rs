//! vellum-editor: the mountable rich-text editor component.
//!
//! The host page owns the canonical markup string and a change callback;
//! this crate owns everything in between. One `Editor` wraps one editing
//! surface and one sync controller, created on mount and torn down on
//! drop, never aliased. All mutation flows through the
//! serialize-after-command path: resolve selection, mutate, serialize,
//! notify.

use bytes::Bytes;

use vellum_editor_core::{
    Command, DocumentSurface, ExternalUpdate, FormatState, ImageAttrs, SelectionDescriptor,
    Surface, SyncController, embed_image, execute_command, query_format_state,
};

/// A mounted rich-text editor instance.
pub struct Editor {
    surface: DocumentSurface,
    sync: SyncController,
    on_change: Box<dyn FnMut(&str)>,
    placeholder: Option<String>,
}

impl Editor {
    /// Mount an editor over a host-provided canonical value.
    ///
    /// `on_change` is invoked with the new canonical string after every
    /// serialization - including command executions that turned out to be
    /// no-ops, so the host must tolerate redundant notifications.
    pub fn mount(value: &str, on_change: impl FnMut(&str) + 'static) -> Self {
        let surface = DocumentSurface::from_markup(value);
        let baseline = surface.serialize();
        tracing::debug!(value_len = value.len(), "editor mounted");
        Self {
            surface,
            sync: SyncController::mounted(baseline),
            on_change: Box::new(on_change),
            placeholder: None,
        }
    }

    /// Set the cosmetic hint shown while the surface has no content.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    // === Host boundary ===

    /// The current canonical value.
    pub fn value(&self) -> String {
        self.surface.serialize()
    }

    /// Push an externally changed canonical value into the editor.
    ///
    /// Values that merely echo this editor's own last notification are
    /// suppressed; the surface (and the user's caret) stay untouched.
    /// Genuinely different values replace the surface content wholesale.
    pub fn set_value(&mut self, incoming: &str) {
        match self.sync.classify_external(incoming) {
            ExternalUpdate::Echo => {}
            ExternalUpdate::Reload => {
                self.surface.reload(incoming);
                self.sync.confirm_reload(self.surface.serialize());
            }
        }
    }

    /// The placeholder hint, present only while the surface has zero
    /// content nodes.
    pub fn placeholder_text(&self) -> Option<&str> {
        if self.surface.is_empty() {
            self.placeholder.as_deref()
        } else {
            None
        }
    }

    // === Editing ===

    /// Execute a formatting or insertion command at the current selection.
    pub fn execute(&mut self, command: &Command) {
        let changed = execute_command(&mut self.surface, command);
        if !changed {
            tracing::trace!(command = command.name(), "command was a no-op");
        }
        self.notify();
    }

    /// Type text at the current selection (replacing it if non-collapsed).
    pub fn insert_text(&mut self, text: &str) {
        self.surface.replace_selection_with_text(text);
        self.notify();
    }

    /// Embed a user-picked file as an inline image at the insertion point.
    ///
    /// Non-image attachments are rejected silently: nothing is inserted,
    /// no notification fires, and the editor stays usable. Returns whether
    /// the image was inserted.
    pub fn attach_image(&mut self, data: Bytes, declared_mime: &str, alt: Option<String>) -> bool {
        match embed_image(&data, declared_mime, alt) {
            Ok(embedded) => {
                self.execute(&Command::InsertImage(ImageAttrs {
                    src: embedded.data_uri,
                    alt: embedded.alt,
                }));
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "attachment rejected, nothing inserted");
                false
            }
        }
    }

    // === Selection ===

    /// Report a user selection (mouse or keyboard) to the editor.
    /// Descriptors referencing removed content degrade to end-of-content.
    pub fn select(&mut self, selection: SelectionDescriptor) {
        self.surface.restore(selection);
    }

    /// Drop the current selection (surface lost focus).
    pub fn clear_selection(&mut self) {
        self.surface.set_selection(None);
    }

    /// The current selection, if any.
    pub fn selection(&self) -> Option<SelectionDescriptor> {
        self.surface.capture()
    }

    // === Read-out ===

    /// Formatting active at the current selection, for toolbar state.
    pub fn format_state(&self) -> FormatState {
        query_format_state(&self.surface)
    }

    /// Plain text of the document, for excerpts.
    pub fn text(&self) -> String {
        self.surface.surface_text()
    }

    /// Whether a local edit is awaiting its round trip through the host.
    pub fn is_editing(&self) -> bool {
        self.sync.is_editing()
    }

    /// The live surface, for hosts that render the block structure
    /// directly.
    pub fn surface(&self) -> &DocumentSurface {
        &self.surface
    }

    fn notify(&mut self) {
        let serialized = self.surface.serialize();
        self.sync.record_local(&serialized);
        (self.on_change)(&serialized);
    }
}
