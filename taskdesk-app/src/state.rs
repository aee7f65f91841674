use std::cell::Cell;
use std::path::PathBuf;

/// Everything a user can do. Render functions attach these to list items and
/// front ends feed them to `Controller::dispatch`.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Bootstrap,
    RefreshProjects,
    RefreshTeamMembers,
    Input(Field, String),
    SelectProject(Option<i64>),
    SelectTask(Option<i64>),
    SelectTeamProject(Option<i64>),
    SelectTeamMember(Option<i64>),
    SelectAiProject(Option<i64>),
    SelectReportProject(Option<i64>),
    ShowProjectDetails(i64),
    CreateProject,
    CreateTask,
    CreateTeamMember,
    AssignTeamMember,
    AskAi,
    PrioritizeTask,
    SuggestForTask,
    GenerateReport,
    ExportReportPdf(PathBuf),
}

/// Free-text input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ProjectName,
    ProjectDescription,
    TaskTitle,
    TaskDescription,
    TaskSkills,
    MemberName,
    MemberEmail,
    MemberSkills,
    MemberRole,
    AiQuestion,
}

/// Current contents of every form input and selector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub project_name: String,
    pub project_description: String,

    pub selected_project: Option<i64>,
    pub task_title: String,
    pub task_description: String,
    pub task_skills: String,
    pub selected_task: Option<i64>,

    pub member_name: String,
    pub member_email: String,
    pub member_skills: String,
    /// Sent as `null` when empty
    pub member_role: String,
    pub team_project: Option<i64>,
    pub selected_member: Option<i64>,

    pub ai_project: Option<i64>,
    pub ai_question: String,

    pub report_project: Option<i64>,
}

impl FormState {
    pub fn set_input(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::ProjectName => &mut self.project_name,
            Field::ProjectDescription => &mut self.project_description,
            Field::TaskTitle => &mut self.task_title,
            Field::TaskDescription => &mut self.task_description,
            Field::TaskSkills => &mut self.task_skills,
            Field::MemberName => &mut self.member_name,
            Field::MemberEmail => &mut self.member_email,
            Field::MemberSkills => &mut self.member_skills,
            Field::MemberRole => &mut self.member_role,
            Field::AiQuestion => &mut self.ai_question,
        };
        *slot = value;
    }

    pub fn clear_project_inputs(&mut self) {
        self.project_name.clear();
        self.project_description.clear();
    }

    pub fn clear_task_inputs(&mut self) {
        self.task_title.clear();
        self.task_description.clear();
        self.task_skills.clear();
    }

    pub fn clear_member_inputs(&mut self) {
        self.member_name.clear();
        self.member_email.clear();
        self.member_skills.clear();
        self.member_role.clear();
    }

    /// Drop project selections that are not in the freshly fetched list.
    /// Returns true when the task-list project was dropped.
    pub fn retain_projects(&mut self, ids: &[i64]) -> bool {
        let keep = |slot: &mut Option<i64>| {
            if slot.is_some_and(|id| !ids.contains(&id)) {
                *slot = None;
                true
            } else {
                false
            }
        };
        let dropped = keep(&mut self.selected_project);
        keep(&mut self.team_project);
        keep(&mut self.ai_project);
        keep(&mut self.report_project);
        if dropped {
            self.selected_task = None;
        }
        dropped
    }

    pub fn retain_tasks(&mut self, ids: &[i64]) {
        if self.selected_task.is_some_and(|id| !ids.contains(&id)) {
            self.selected_task = None;
        }
    }

    pub fn retain_members(&mut self, ids: &[i64]) {
        if self.selected_member.is_some_and(|id| !ids.contains(&id)) {
            self.selected_member = None;
        }
    }
}

/// Hands out increasing tokens so a response can tell whether a newer
/// request for the same region has been issued since.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: Cell<u64>,
}

impl RequestGeneration {
    pub fn begin(&self) -> u64 {
        let next = self.current.get() + 1;
        self.current.set(next);
        next
    }

    /// Invalidate every outstanding token.
    pub fn invalidate(&self) {
        self.begin();
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current.get() == token
    }
}
