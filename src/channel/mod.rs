//! The serialized channel: one device, many callers, mirrored transcripts.
//!
//! Invariant: all device I/O flows through the floor, held by the single
//! caller admitted by the internal FIFO queue at any instant. Every operation
//! that
//! produces user-visible text, prompts and input echo included, mirrors the
//! same message to every delegate log, so a delegate is a faithful transcript
//! of the session.

mod floor;
mod layout;

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::core::device::Device;
use crate::core::message::{Msg, PartKind};
use crate::core::style::StyleFn;
use crate::core::text::visible_width;
use crate::log::Log;
use floor::FloorQueue;

pub const DEFAULT_BAD_CHOICE_MSG: &str = "Invalid choice: {}";
pub const DEFAULT_EMPTY_CHOICE_MSG: &str = "Choose one of: {}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel has been closed; no further floor grants occur.
    #[error("channel is closed")]
    Closed,
    /// The calling thread already holds the floor.
    #[error("reentrant channel access from the thread holding the floor")]
    Reentrant,
    /// Prompt configuration rejected before any I/O was performed.
    #[error("invalid prompt: {0}")]
    InvalidPrompt(String),
}

/// Configuration for [`Channel::prompt`].
///
/// An empty-string choice means "press Enter"; it is offered as `Enter` at the
/// end of the displayed list and is always selectable by entering nothing.
pub struct PromptOptions {
    /// Valid choices, possibly including `""`.
    pub choices: Vec<String>,
    /// Returned (lowercased) when the user enters nothing and no empty-string
    /// choice exists. Must be one of `choices`.
    pub default_choice: Option<String>,
    /// Whether the choice list is appended to the prompt text.
    pub show_choices: bool,
    /// Choices kept out of the displayed list but still valid to type.
    pub hidden_choices: Vec<String>,
    /// Retry message for an unrecognized answer; `{}` is replaced with the
    /// user's trimmed, lowercased input.
    pub bad_choice_msg: String,
    /// Retry message for an empty or cancelled answer; `{}` is replaced with
    /// the displayed choice list.
    pub empty_choice_msg: String,
}

impl PromptOptions {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            default_choice: None,
            show_choices: true,
            hidden_choices: Vec::new(),
            bad_choice_msg: DEFAULT_BAD_CHOICE_MSG.to_string(),
            empty_choice_msg: DEFAULT_EMPTY_CHOICE_MSG.to_string(),
        }
    }

    pub fn default_choice(mut self, choice: impl Into<String>) -> Self {
        self.default_choice = Some(choice.into());
        self
    }

    pub fn hide_choice_list(mut self) -> Self {
        self.show_choices = false;
        self
    }

    pub fn hidden<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn bad_choice_msg(mut self, msg: impl Into<String>) -> Self {
        self.bad_choice_msg = msg.into();
        self
    }

    pub fn empty_choice_msg(mut self, msg: impl Into<String>) -> Self {
        self.empty_choice_msg = msg.into();
        self
    }
}

/// Validated prompt state shared by every retry iteration.
struct PromptPlan {
    question: String,
    lowered: Vec<String>,
    shown: String,
    has_empty_choice: bool,
    default_choice: Option<String>,
}

/// Replace the first `{}` placeholder if one is present.
fn fill_template(template: &str, value: &str) -> String {
    if template.contains("{}") {
        template.replacen("{}", value, 1)
    } else {
        template.to_string()
    }
}

/// Serialized I/O over a [`Device`], fanned out to delegate [`Log`]s.
pub struct Channel<D: Device> {
    device: Mutex<D>,
    delegates: Vec<Arc<dyn Log>>,
    style: Option<Box<StyleFn>>,
    floor: FloorQueue,
}

impl<D: Device> Channel<D> {
    pub fn new(device: D) -> Self {
        Self {
            device: Mutex::new(device),
            delegates: Vec::new(),
            style: None,
            floor: FloorQueue::default(),
        }
    }

    /// Add a delegate log that mirrors everything this channel outputs.
    pub fn delegate(mut self, log: Arc<dyn Log>) -> Self {
        self.delegates.push(log);
        self
    }

    /// Set the renderer applied to device output. Delegates are unaffected;
    /// each applies its own renderer.
    pub fn style(mut self, style: Box<StyleFn>) -> Self {
        self.style = Some(style);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.floor.is_closed()
    }

    fn device(&self) -> MutexGuard<'_, D> {
        match self.device.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn mirror(&self, msg: &Msg) {
        for delegate in &self.delegates {
            delegate.output(msg);
        }
    }

    fn output_nosync(&self, device: &mut D, msg: &Msg) {
        device.write_text(&msg.render(self.style.as_deref()));
        self.mirror(msg);
    }

    fn input_nosync(
        &self,
        device: &mut D,
        prompt: Option<&str>,
        autocomplete: Option<&[String]>,
    ) -> Option<String> {
        // The prompt is mirrored before the read, once: the physical read
        // displays it itself.
        let prompt_text = prompt.filter(|text| !text.is_empty()).map(|text| {
            let msg = Msg::new().terminator(" ").question(text);
            self.mirror(&msg);
            msg.render(self.style.as_deref())
        });

        if let Some(candidates) = autocomplete {
            device.set_autocomplete(Some(candidates));
        }
        let line = device.read_line(prompt_text.as_deref());
        device.set_autocomplete(None);

        match &line {
            None => self.mirror(&Msg::new().plain("")),
            Some(text) => self.mirror(&Msg::new().answer(text)),
        }
        line
    }

    fn prompt_plan(prompt: &str, options: &PromptOptions) -> Result<PromptPlan, ChannelError> {
        let mut lowered = Vec::new();
        let mut shown = String::new();
        let mut has_empty_choice = false;

        for choice in &options.choices {
            if choice.is_empty() {
                has_empty_choice = true;
                continue;
            }
            lowered.push(choice.to_lowercase());
            if !options.hidden_choices.contains(choice) {
                shown.push_str(choice);
                shown.push('/');
            }
        }
        if has_empty_choice {
            shown.push_str("Enter");
        } else {
            shown.pop();
        }

        if lowered.is_empty() && !has_empty_choice {
            return Err(ChannelError::InvalidPrompt("no choices given".to_string()));
        }
        if let Some(default) = &options.default_choice {
            if !lowered.contains(&default.to_lowercase()) {
                return Err(ChannelError::InvalidPrompt(format!(
                    "default choice {default:?} is not one of the choices"
                )));
            }
        }

        let question = if options.show_choices {
            format!("{prompt} ({shown}):")
        } else {
            format!("{prompt}:")
        };

        Ok(PromptPlan {
            question,
            lowered,
            shown,
            has_empty_choice,
            default_choice: options.default_choice.clone(),
        })
    }

    fn prompt_nosync(
        &self,
        device: &mut D,
        prompt: &str,
        options: &PromptOptions,
    ) -> Result<String, ChannelError> {
        let plan = Self::prompt_plan(prompt, options)?;

        loop {
            match self.input_nosync(device, Some(&plan.question), None) {
                None => {
                    let notice = fill_template(&options.empty_choice_msg, &plan.shown);
                    self.output_nosync(device, &Msg::new().error(notice));
                }
                Some(line) => {
                    let choice = line.trim().to_lowercase();
                    if choice.is_empty() {
                        if plan.has_empty_choice {
                            return Ok(String::new());
                        }
                        if let Some(default) = &plan.default_choice {
                            return Ok(default.to_lowercase());
                        }
                        let notice = fill_template(&options.empty_choice_msg, &plan.shown);
                        self.output_nosync(device, &Msg::new().error(notice));
                    } else if plan.lowered.contains(&choice) {
                        return Ok(choice);
                    } else {
                        let notice = fill_template(&options.bad_choice_msg, &choice);
                        self.output_nosync(device, &Msg::new().error(notice));
                    }
                }
            }
        }
    }

    /// Print a message to the device and every delegate.
    pub fn output(&self, msg: &Msg) -> Result<(), ChannelError> {
        let _floor = self.floor.acquire()?;
        self.output_nosync(&mut self.device(), msg);
        Ok(())
    }

    /// Read one line of input, optionally showing `prompt` first.
    ///
    /// Returns `Ok(None)` on end-of-input. Prefer passing the prompt here over
    /// printing it separately; a separate print and read can no longer be
    /// treated as one unit by line-editing devices.
    pub fn input(
        &self,
        prompt: Option<&str>,
        autocomplete: Option<&[String]>,
    ) -> Result<Option<String>, ChannelError> {
        let _floor = self.floor.acquire()?;
        Ok(self.input_nosync(&mut self.device(), prompt, autocomplete))
    }

    /// Ask the user to pick one of `options.choices`, retrying until a valid
    /// choice is entered. Returns the lowercased choice.
    ///
    /// The loop has no iteration cap; in pipe contexts where reads always hit
    /// end-of-input it re-prompts forever, so batch callers must be able to
    /// interrupt at the process level.
    pub fn prompt(&self, prompt: &str, options: &PromptOptions) -> Result<String, ChannelError> {
        let _floor = self.floor.acquire()?;
        let mut device = self.device();
        self.prompt_nosync(&mut device, prompt, options)
    }

    /// Hold the floor for the whole scope and hand it raw, unsynchronized I/O.
    ///
    /// Calling any synchronized method on this channel from inside the scope
    /// fails with [`ChannelError::Reentrant`] instead of deadlocking.
    pub fn exclusive_io<R>(
        &self,
        scope: impl FnOnce(&mut RawIo<'_, D>) -> R,
    ) -> Result<R, ChannelError> {
        let _floor = self.floor.acquire()?;
        let device = self.device();
        let mut raw = RawIo {
            channel: self,
            device,
        };
        Ok(scope(&mut raw))
    }

    /// Device dimensions as `(columns, rows)`; `None` when unknown.
    pub fn window_size(&self) -> Result<(Option<u16>, Option<u16>), ChannelError> {
        let _floor = self.floor.acquire()?;
        Ok(self.device().size())
    }

    /// Print many short messages in aligned columns, `ls`-style, under a
    /// single floor acquisition.
    ///
    /// Falls back to one message per line when any message embeds a line
    /// break, the terminal width is unknown, or no column count fits.
    pub fn output_list(&self, msgs: &[Msg], prefix: &str) -> Result<(), ChannelError> {
        if msgs.is_empty() {
            return Ok(());
        }

        let multiline = msgs.iter().any(|msg| msg.has_embedded_newline());
        let plan = match (multiline, self.window_size()?.0) {
            (false, Some(cols)) => {
                let widths: Vec<usize> = msgs.iter().map(Msg::width).collect();
                layout::column_plan(&widths, visible_width(prefix), cols as usize)
            }
            _ => None,
        };

        let _floor = self.floor.acquire()?;
        let mut device = self.device();

        let Some(plan) = plan else {
            for msg in msgs {
                self.output_nosync(&mut device, msg);
                self.output_nosync(&mut device, &Msg::new().plain(""));
            }
            return Ok(());
        };

        for row in 0..plan.rows {
            for (col, col_width) in plan.col_widths.iter().enumerate() {
                let Some(msg) = msgs.get(col * plan.rows + row) else {
                    continue;
                };
                self.output_nosync(&mut device, &Msg::new().terminator("").plain(prefix));
                self.output_nosync(&mut device, &msg.clone().terminator(""));
                let pad = col_width.saturating_sub(msg.width());
                if pad > 0 {
                    self.output_nosync(
                        &mut device,
                        &Msg::new().terminator("").plain(" ".repeat(pad)),
                    );
                }
            }
            self.output_nosync(&mut device, &Msg::new().plain(""));
        }
        Ok(())
    }

    /// Print `text` inside a bordered frame as one atomic message.
    pub fn output_bordered(&self, kind: PartKind, text: &str) -> Result<(), ChannelError> {
        let cols = self.window_size()?.0.map(usize::from);
        let mut msg = Msg::new().separator("\n");
        for line in layout::framed_lines(text, cols) {
            msg = msg.add(kind, line);
        }
        self.output(&msg)
    }

    pub fn print(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.output(&Msg::new().plain(text))
    }

    pub fn status(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.output(&Msg::new().status(text))
    }

    pub fn error(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.output(&Msg::new().error(text))
    }

    pub fn accent(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.output(&Msg::new().accent(text))
    }

    pub fn bright(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.output(&Msg::new().bright(text))
    }

    pub fn bg_happy(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.output(&Msg::new().bg_happy(text))
    }

    pub fn bg_sad(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.output(&Msg::new().bg_sad(text))
    }

    pub fn bg_neutral(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.output(&Msg::new().bg_neutral(text))
    }

    pub fn print_bordered(&self, text: &str) -> Result<(), ChannelError> {
        self.output_bordered(PartKind::Plain, text)
    }

    pub fn status_bordered(&self, text: &str) -> Result<(), ChannelError> {
        self.output_bordered(PartKind::Status, text)
    }

    pub fn error_bordered(&self, text: &str) -> Result<(), ChannelError> {
        self.output_bordered(PartKind::Error, text)
    }

    pub fn accent_bordered(&self, text: &str) -> Result<(), ChannelError> {
        self.output_bordered(PartKind::Accent, text)
    }

    pub fn bright_bordered(&self, text: &str) -> Result<(), ChannelError> {
        self.output_bordered(PartKind::Bright, text)
    }

    /// Close the channel: cascade close to every delegate, tear the device
    /// down, and refuse all further operations.
    ///
    /// Close goes through the same admission queue as any other operation, so
    /// it is never concurrent with an in-flight output or read. A second call
    /// fails with [`ChannelError::Closed`]; the teardown ran exactly once.
    pub fn close(&self) -> Result<(), ChannelError> {
        let floor = self.floor.acquire()?;
        floor.mark_closed();
        for delegate in &self.delegates {
            delegate.close();
        }
        self.device().close();
        Ok(())
    }
}

/// Unsynchronized I/O handed to an [`Channel::exclusive_io`] scope while the
/// calling thread holds the floor.
pub struct RawIo<'a, D: Device> {
    channel: &'a Channel<D>,
    device: MutexGuard<'a, D>,
}

impl<D: Device> RawIo<'_, D> {
    pub fn output(&mut self, msg: &Msg) {
        self.channel.output_nosync(&mut self.device, msg);
    }

    pub fn input(
        &mut self,
        prompt: Option<&str>,
        autocomplete: Option<&[String]>,
    ) -> Option<String> {
        self.channel.input_nosync(&mut self.device, prompt, autocomplete)
    }

    pub fn prompt(
        &mut self,
        prompt: &str,
        options: &PromptOptions,
    ) -> Result<String, ChannelError> {
        self.channel.prompt_nosync(&mut self.device, prompt, options)
    }

    pub fn window_size(&self) -> (Option<u16>, Option<u16>) {
        self.device.size()
    }
}
