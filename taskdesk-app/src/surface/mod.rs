//! The display surface the controller renders into.
//!
//! Each [`Region`] and [`Selector`] is owned by exactly one render function;
//! the controller never reaches into a surface except through this trait.

use std::fmt;

use crate::state::Action;

pub mod memory;
pub mod terminal;

pub use memory::MemorySurface;
pub use terminal::TerminalSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    ProjectList,
    TaskList,
    TeamMemberList,
    ProjectDetails,
    AiResponse,
    TaskActions,
    ProjectReport,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::ProjectList => "project list",
            Region::TaskList => "task list",
            Region::TeamMemberList => "team member list",
            Region::ProjectDetails => "project details",
            Region::AiResponse => "AI response",
            Region::TaskActions => "task actions",
            Region::ProjectReport => "project report",
        };
        f.write_str(name)
    }
}

/// Which collection a selector offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Projects,
    Tasks,
    TeamMembers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Drives the task list and the task actions
    Project,
    TeamProject,
    AiProject,
    ReportProject,
    Task,
    TeamMember,
}

impl Selector {
    pub const PROJECT_SELECTORS: [Selector; 4] = [
        Selector::Project,
        Selector::AiProject,
        Selector::ReportProject,
        Selector::TeamProject,
    ];

    pub fn kind(self) -> SelectorKind {
        match self {
            Selector::Project
            | Selector::TeamProject
            | Selector::AiProject
            | Selector::ReportProject => SelectorKind::Projects,
            Selector::Task => SelectorKind::Tasks,
            Selector::TeamMember => SelectorKind::TeamMembers,
        }
    }

    /// Placeholder label shown before any real option
    pub fn placeholder(self) -> &'static str {
        match self.kind() {
            SelectorKind::Projects => "Select a project",
            SelectorKind::Tasks => "Select a task",
            SelectorKind::TeamMembers => "Select a team member",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Selector::Project => "project",
            Selector::TeamProject => "team project",
            Selector::AiProject => "AI project",
            Selector::ReportProject => "report project",
            Selector::Task => "task",
            Selector::TeamMember => "team member",
        };
        f.write_str(name)
    }
}

/// A control bound to a list item, replacing markup-driven global handlers
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAction {
    pub label: String,
    pub action: Action,
}

impl ItemAction {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub key: i64,
    pub text: String,
    pub detail: Option<String>,
    pub actions: Vec<ItemAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// `None` for the placeholder
    pub value: Option<i64>,
    pub label: String,
}

impl SelectOption {
    pub fn placeholder(selector: Selector) -> Self {
        Self {
            value: None,
            label: selector.placeholder().to_string(),
        }
    }
}

/// Content of a detail panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    Bullets(Vec<String>),
}

pub trait DisplaySurface {
    /// Replace a list region with a header and one entry per item, in order.
    fn render_list(&mut self, region: Region, header: &str, items: Vec<ListItem>);

    /// Replace every option of a selector.
    fn render_options(&mut self, selector: Selector, options: Vec<SelectOption>);

    /// Replace a detail panel.
    fn render_panel(&mut self, region: Region, blocks: Vec<Block>);

    fn show_notice(&mut self, message: &str);

    /// Blocking user-visible error notification
    fn show_error(&mut self, message: &str);
}
