use std::cell::{Ref, RefCell};
use std::path::Path;

use taskdesk_models::{
    parse_skills, AiQuestion, CreateProjectRequest, CreateTaskRequest, CreateTeamMemberRequest,
    Task,
};
use tracing::{debug, error, info, warn};

use crate::api_client::ApiClient;
use crate::config::DeskConfig;
use crate::error::{ActionError, ApiError, ValidationError};
use crate::render;
use crate::state::{Action, Field, FormState, RequestGeneration};
use crate::surface::DisplaySurface;

/// Binds user actions to accessor + render pairs.
///
/// All handlers take `&self` so several can be in flight on one thread
/// (`tokio::join!`, a `LocalSet`); interior state is only borrowed between
/// awaits. Every failure is logged and shown on the surface before it is
/// returned, and never leaves the controller unusable.
pub struct Controller<S: DisplaySurface> {
    api: ApiClient,
    surface: RefCell<S>,
    form: RefCell<FormState>,
    task_requests: RequestGeneration,
    /// Ids currently offered by the task selector
    shown_tasks: RefCell<Vec<i64>>,
}

impl<S: DisplaySurface> Controller<S> {
    pub fn new(api: ApiClient, surface: S) -> Self {
        Self {
            api,
            surface: RefCell::new(surface),
            form: RefCell::new(FormState::default()),
            task_requests: RequestGeneration::default(),
            shown_tasks: RefCell::new(Vec::new()),
        }
    }

    pub fn from_config(config: &DeskConfig, surface: S) -> Result<Self, ApiError> {
        Ok(Self::new(ApiClient::from_settings(&config.api)?, surface))
    }

    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    pub fn into_surface(self) -> S {
        self.surface.into_inner()
    }

    pub fn form(&self) -> Ref<'_, FormState> {
        self.form.borrow()
    }

    pub fn set_input(&self, field: Field, value: impl Into<String>) {
        self.form.borrow_mut().set_input(field, value.into());
    }

    /// Change several inputs and selections at once without triggering fetches.
    pub fn edit_form(&self, edit: impl FnOnce(&mut FormState)) {
        edit(&mut self.form.borrow_mut());
    }

    pub async fn dispatch(&self, action: Action) -> Result<(), ActionError> {
        debug!("Dispatching {:?}", action);
        match action {
            Action::Bootstrap => self.bootstrap().await,
            Action::RefreshProjects => self.refresh_projects().await,
            Action::RefreshTeamMembers => self.refresh_team_members().await,
            Action::Input(field, value) => {
                self.set_input(field, value);
                Ok(())
            }
            Action::SelectProject(project_id) => self.select_project(project_id).await,
            Action::SelectTask(task_id) => self.select_task(task_id),
            Action::SelectTeamProject(project_id) => {
                self.form.borrow_mut().team_project = project_id;
                Ok(())
            }
            Action::SelectTeamMember(member_id) => {
                self.form.borrow_mut().selected_member = member_id;
                Ok(())
            }
            Action::SelectAiProject(project_id) => {
                self.form.borrow_mut().ai_project = project_id;
                Ok(())
            }
            Action::SelectReportProject(project_id) => {
                self.form.borrow_mut().report_project = project_id;
                Ok(())
            }
            Action::ShowProjectDetails(project_id) => self.show_project_details(project_id).await,
            Action::CreateProject => self.create_project().await,
            Action::CreateTask => self.create_task().await,
            Action::CreateTeamMember => self.create_team_member().await,
            Action::AssignTeamMember => self.assign_team_member().await,
            Action::AskAi => self.ask_ai().await,
            Action::PrioritizeTask => self.prioritize_task().await,
            Action::SuggestForTask => self.suggest_for_task().await,
            Action::GenerateReport => self.generate_report().await,
            Action::ExportReportPdf(path) => self.export_report_pdf(&path).await,
        }
    }

    /// Initial load: projects and team members, fetched concurrently.
    pub async fn bootstrap(&self) -> Result<(), ActionError> {
        info!("Loading projects and team members");
        let (projects, members) =
            tokio::join!(self.refresh_projects(), self.refresh_team_members());
        projects.and(members)
    }

    // Reads

    pub async fn refresh_projects(&self) -> Result<(), ActionError> {
        let projects = self
            .api
            .list_projects()
            .await
            .map_err(|e| self.fail("Failed to fetch projects", e))?;
        debug!("Fetched {} projects", projects.len());

        render::render_projects(&mut *self.surface.borrow_mut(), &projects);

        let ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
        let dropped = self.form.borrow_mut().retain_projects(&ids);
        if dropped {
            debug!("Selected project is gone, clearing task list");
            self.task_requests.invalidate();
            self.show_tasks(&[]);
        }
        Ok(())
    }

    pub async fn refresh_team_members(&self) -> Result<(), ActionError> {
        let members = self
            .api
            .list_team_members()
            .await
            .map_err(|e| self.fail("Failed to fetch team members", e))?;
        debug!("Fetched {} team members", members.len());

        render::render_team_members(&mut *self.surface.borrow_mut(), &members);

        let ids: Vec<i64> = members.iter().map(|m| m.id).collect();
        self.form.borrow_mut().retain_members(&ids);
        Ok(())
    }

    /// Fetch and render the tasks of a project. A response that arrives after
    /// a newer task request was issued is dropped.
    pub async fn refresh_tasks(&self, project_id: i64) -> Result<(), ActionError> {
        let token = self.task_requests.begin();
        let result = self.api.list_tasks(project_id).await;

        if !self.task_requests.is_current(token) {
            debug!("Discarding stale task list for project {}", project_id);
            return Ok(());
        }

        let tasks = result.map_err(|e| self.fail("Failed to fetch tasks", e))?;
        debug!("Fetched {} tasks for project {}", tasks.len(), project_id);

        self.show_tasks(&tasks);

        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        self.form.borrow_mut().retain_tasks(&ids);
        Ok(())
    }

    /// Selecting a different project drops the previous project's tasks even
    /// when the new list cannot be fetched.
    pub async fn select_project(&self, project_id: Option<i64>) -> Result<(), ActionError> {
        let changed = {
            let mut form = self.form.borrow_mut();
            let changed = form.selected_project != project_id;
            if changed {
                form.selected_task = None;
            }
            form.selected_project = project_id;
            changed
        };

        match project_id {
            Some(project_id) => {
                let result = self.refresh_tasks(project_id).await;
                if result.is_err() && changed {
                    self.show_tasks(&[]);
                }
                result
            }
            None => {
                self.task_requests.invalidate();
                self.show_tasks(&[]);
                Ok(())
            }
        }
    }

    pub fn select_task(&self, task_id: Option<i64>) -> Result<(), ActionError> {
        if let Some(task_id) = task_id {
            if !self.shown_tasks.borrow().contains(&task_id) {
                return Err(self.invalid(ValidationError::new(
                    "Please select a task from the task list.",
                )));
            }
        }
        self.form.borrow_mut().selected_task = task_id;
        Ok(())
    }

    pub async fn show_project_details(&self, project_id: i64) -> Result<(), ActionError> {
        let project = self
            .api
            .get_project(project_id)
            .await
            .map_err(|e| self.fail("Failed to load project details", e))?;
        render::render_project_details(&mut *self.surface.borrow_mut(), &project);
        Ok(())
    }

    // Writes

    pub async fn create_project(&self) -> Result<(), ActionError> {
        let request = project_request(&self.form.borrow()).map_err(|e| self.invalid(e))?;

        let project = self
            .api
            .create_project(&request)
            .await
            .map_err(|e| self.fail("Failed to create project", e))?;
        info!("Project created: {} ({})", project.name, project.id);

        self.form.borrow_mut().clear_project_inputs();
        self.refresh_projects().await
    }

    pub async fn create_task(&self) -> Result<(), ActionError> {
        let (project_id, request) =
            task_request(&self.form.borrow()).map_err(|e| self.invalid(e))?;

        let task = self
            .api
            .create_task(project_id, &request)
            .await
            .map_err(|e| self.fail("Failed to create task", e))?;
        info!("Task created: {} ({})", task.title, task.id);

        self.form.borrow_mut().clear_task_inputs();
        // The user may have switched projects while the task was being created
        let still_selected = self.form.borrow().selected_project == Some(project_id);
        if still_selected {
            self.refresh_tasks(project_id).await
        } else {
            Ok(())
        }
    }

    pub async fn create_team_member(&self) -> Result<(), ActionError> {
        let request = member_request(&self.form.borrow()).map_err(|e| self.invalid(e))?;

        let member = self
            .api
            .create_team_member(&request)
            .await
            .map_err(|e| self.fail("Failed to create team member", e))?;
        info!("Team member created: {} ({})", member.name, member.id);

        self.form.borrow_mut().clear_member_inputs();
        self.refresh_team_members().await
    }

    pub async fn assign_team_member(&self) -> Result<(), ActionError> {
        let (project_id, member_id) = {
            let form = self.form.borrow();
            (form.team_project, form.selected_member)
        };
        let (Some(project_id), Some(member_id)) = (project_id, member_id) else {
            return Err(self.invalid(ValidationError::new(
                "Please select both a project and a team member.",
            )));
        };

        self.api
            .assign_team_member(project_id, member_id)
            .await
            .map_err(|e| self.fail("Failed to assign team member to project", e))?;
        info!("Team member {} assigned to project {}", member_id, project_id);

        self.surface
            .borrow_mut()
            .show_notice("Team member assigned to project successfully.");
        self.refresh_projects().await
    }

    // AI

    pub async fn ask_ai(&self) -> Result<(), ActionError> {
        let (project_id, question) =
            ai_question(&self.form.borrow()).map_err(|e| self.invalid(e))?;

        let answer = self
            .api
            .ask_ai(project_id, &question)
            .await
            .map_err(|e| self.fail("Failed to get AI response", e))?;

        render::render_ai_answer(&mut *self.surface.borrow_mut(), &answer.answer);
        Ok(())
    }

    pub async fn prioritize_task(&self) -> Result<(), ActionError> {
        let (project_id, task_id) =
            selected_task(&self.form.borrow()).map_err(|e| self.invalid(e))?;

        let result = self
            .api
            .prioritize_task(project_id, task_id)
            .await
            .map_err(|e| self.fail("Failed to prioritize task", e))?;
        info!(
            "Task {} prioritized: {}",
            task_id,
            result.priority.as_deref().unwrap_or("unknown")
        );

        render::render_priority(&mut *self.surface.borrow_mut(), &result);
        self.refresh_tasks(project_id).await
    }

    pub async fn suggest_for_task(&self) -> Result<(), ActionError> {
        let (project_id, task_id) =
            selected_task(&self.form.borrow()).map_err(|e| self.invalid(e))?;

        let suggestions = self
            .api
            .suggest_for_task(project_id, task_id)
            .await
            .map_err(|e| self.fail("Failed to get suggestions", e))?;

        render::render_suggestions(&mut *self.surface.borrow_mut(), &suggestions);
        Ok(())
    }

    pub async fn generate_report(&self) -> Result<(), ActionError> {
        let project_id = report_project(&self.form.borrow()).map_err(|e| self.invalid(e))?;

        let report = self
            .api
            .generate_report(project_id)
            .await
            .map_err(|e| self.fail("Failed to generate report", e))?;

        render::render_report(&mut *self.surface.borrow_mut(), &report);
        Ok(())
    }

    pub async fn export_report_pdf(&self, path: &Path) -> Result<(), ActionError> {
        let project_id = report_project(&self.form.borrow()).map_err(|e| self.invalid(e))?;

        let pdf = self
            .api
            .generate_report_pdf(project_id)
            .await
            .map_err(|e| self.fail("Failed to generate report", e))?;
        tokio::fs::write(path, &pdf)
            .await
            .map_err(|e| self.fail("Failed to save report", e))?;
        info!("Wrote {} byte report to {}", pdf.len(), path.display());

        self.surface
            .borrow_mut()
            .show_notice(&format!("Report saved to {}", path.display()));
        Ok(())
    }

    fn show_tasks(&self, tasks: &[Task]) {
        render::render_tasks(&mut *self.surface.borrow_mut(), tasks);
        *self.shown_tasks.borrow_mut() = tasks.iter().map(|t| t.id).collect();
    }

    fn fail(&self, context: &str, err: impl Into<ActionError>) -> ActionError {
        let err = err.into();
        error!("{}: {}", context, err);
        self.surface
            .borrow_mut()
            .show_error(&format!("{}: {}", context, err));
        err
    }

    fn invalid(&self, err: ValidationError) -> ActionError {
        warn!("Rejected input: {}", err);
        self.surface.borrow_mut().show_error(&err.0);
        err.into()
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn project_request(form: &FormState) -> Result<CreateProjectRequest, ValidationError> {
    let name = non_empty(&form.project_name)
        .ok_or_else(|| ValidationError::new("Please enter a project name."))?;
    Ok(CreateProjectRequest {
        name: name.to_string(),
        description: form.project_description.trim().to_string(),
    })
}

fn task_request(form: &FormState) -> Result<(i64, CreateTaskRequest), ValidationError> {
    let project_id = form
        .selected_project
        .ok_or_else(|| ValidationError::new("Please select a project first."))?;
    let title = non_empty(&form.task_title)
        .ok_or_else(|| ValidationError::new("Please enter a task title."))?;
    Ok((
        project_id,
        CreateTaskRequest {
            title: title.to_string(),
            description: form.task_description.trim().to_string(),
            required_skills: parse_skills(&form.task_skills),
        },
    ))
}

fn member_request(form: &FormState) -> Result<CreateTeamMemberRequest, ValidationError> {
    let (Some(name), Some(email)) = (non_empty(&form.member_name), non_empty(&form.member_email))
    else {
        return Err(ValidationError::new(
            "Please enter a name and an email for the team member.",
        ));
    };
    Ok(CreateTeamMemberRequest {
        name: name.to_string(),
        email: email.to_string(),
        skills: parse_skills(&form.member_skills),
        role: non_empty(&form.member_role).map(str::to_string),
    })
}

fn ai_question(form: &FormState) -> Result<(i64, AiQuestion), ValidationError> {
    let project_id = form
        .ai_project
        .ok_or_else(|| ValidationError::new("Please select a project first."))?;
    let question = non_empty(&form.ai_question)
        .ok_or_else(|| ValidationError::new("Please enter a question."))?;
    Ok((
        project_id,
        AiQuestion {
            question: question.to_string(),
        },
    ))
}

fn selected_task(form: &FormState) -> Result<(i64, i64), ValidationError> {
    match (form.selected_project, form.selected_task) {
        (Some(project_id), Some(task_id)) => Ok((project_id, task_id)),
        _ => Err(ValidationError::new(
            "Please select a project and a task first.",
        )),
    }
}

fn report_project(form: &FormState) -> Result<i64, ValidationError> {
    form.report_project
        .ok_or_else(|| ValidationError::new("Please select a project first."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_request_requires_name() {
        let mut form = FormState {
            project_name: "  ".to_string(),
            project_description: "Moon".to_string(),
            ..Default::default()
        };
        assert_eq!(
            project_request(&form).unwrap_err().0,
            "Please enter a project name."
        );

        form.project_name = " Apollo ".to_string();
        let request = project_request(&form).unwrap();
        assert_eq!(request.name, "Apollo");
        assert_eq!(request.description, "Moon");
    }

    #[test]
    fn test_task_request_requires_project_then_title() {
        let mut form = FormState {
            task_title: "Fix bug".to_string(),
            ..Default::default()
        };
        assert_eq!(
            task_request(&form).unwrap_err().0,
            "Please select a project first."
        );

        form.selected_project = Some(1);
        form.task_title = "   ".to_string();
        assert_eq!(task_request(&form).unwrap_err().0, "Please enter a task title.");
    }

    #[test]
    fn test_task_request_shapes_body() {
        let form = FormState {
            selected_project: Some(1),
            task_title: "Fix bug".to_string(),
            task_description: "desc".to_string(),
            task_skills: "python".to_string(),
            ..Default::default()
        };
        let (project_id, request) = task_request(&form).unwrap();
        assert_eq!(project_id, 1);
        assert_eq!(request.required_skills, vec!["python"]);
    }

    #[test]
    fn test_member_request_blank_role_is_none() {
        let form = FormState {
            member_name: "Ada".to_string(),
            member_email: "ada@example.com".to_string(),
            member_skills: "math, logic".to_string(),
            member_role: "  ".to_string(),
            ..Default::default()
        };
        let request = member_request(&form).unwrap();
        assert_eq!(request.role, None);
        assert_eq!(request.skills, vec!["math", "logic"]);
    }

    #[test]
    fn test_member_request_needs_email() {
        let form = FormState {
            member_name: "Ada".to_string(),
            ..Default::default()
        };
        assert!(member_request(&form).is_err());
    }

    #[test]
    fn test_selected_task_needs_both() {
        let form = FormState {
            selected_task: Some(3),
            ..Default::default()
        };
        assert!(selected_task(&form).is_err());
    }
}
