use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::config::{default_config_path, DeskConfig};
use crate::controller::Controller;
use crate::error::{ActionError, AppError};
use crate::state::Action;
use crate::surface::{DisplaySurface, TerminalSurface};

#[derive(Debug, Parser)]
#[command(name = "taskdesk")]
#[command(about = "Browse and manage projects, tasks, and team members")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API root, overrides the configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Show projects and team members (default)
    Overview,

    /// List projects
    Projects,

    /// Show one project in detail
    Project {
        #[arg(long)]
        id: i64,
    },

    /// Create a project
    CreateProject {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List the tasks of a project
    Tasks {
        #[arg(long)]
        project: i64,
    },

    /// Create a task in a project
    CreateTask {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated skills
        #[arg(long, default_value = "")]
        skills: String,
    },

    /// List team members
    Members,

    /// Create a team member
    CreateMember {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Comma-separated skills
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long)]
        role: Option<String>,
    },

    /// Assign a team member to a project
    Assign {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        member: i64,
    },

    /// Ask the AI assistant about a project
    Ask {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        question: String,
    },

    /// Let the AI assign a priority to a task
    Prioritize {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        task: i64,
    },

    /// Get AI suggestions for a task
    Suggest {
        #[arg(long)]
        project: i64,
        #[arg(long)]
        task: i64,
    },

    /// Generate a project report
    Report {
        #[arg(long)]
        project: i64,
        /// Save the report as PDF instead of printing it
        #[arg(long)]
        pdf: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<(), AppError> {
        let command = self.command.clone().unwrap_or(Commands::Overview);

        if let Commands::Config { init: true } = command {
            let path = self
                .config
                .clone()
                .or_else(default_config_path)
                .ok_or_else(|| AppError::Config("No configuration directory found".to_string()))?;
            DeskConfig::write_default(&path)?;
            println!("Wrote default configuration to {}", path.display());
            return Ok(());
        }

        let mut config = DeskConfig::load(self.config.as_deref())?;
        if let Some(api_url) = self.api_url {
            config.api.base_url = api_url;
        }

        if let Commands::Config { init: false } = command {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| AppError::Config(format!("Failed to render configuration: {e}")))?;
            print!("{}", rendered);
            return Ok(());
        }

        info!("Using API at {}", config.api.base_url);
        let controller = Controller::from_config(&config, TerminalSurface::stdio())
            .map_err(|e| AppError::Config(e.to_string()))?;
        run_command(&controller, command).await?;
        Ok(())
    }
}

/// Fill the form the way a user would, then fire the matching action.
pub async fn run_command<S: DisplaySurface>(
    controller: &Controller<S>,
    command: Commands,
) -> Result<(), ActionError> {
    let action = match command {
        Commands::Overview | Commands::Config { .. } => Action::Bootstrap,
        Commands::Projects => Action::RefreshProjects,
        Commands::Project { id } => Action::ShowProjectDetails(id),
        Commands::CreateProject { name, description } => {
            controller.edit_form(|form| {
                form.project_name = name;
                form.project_description = description;
            });
            Action::CreateProject
        }
        Commands::Tasks { project } => Action::SelectProject(Some(project)),
        Commands::CreateTask {
            project,
            title,
            description,
            skills,
        } => {
            controller.edit_form(|form| {
                form.selected_project = Some(project);
                form.task_title = title;
                form.task_description = description;
                form.task_skills = skills;
            });
            Action::CreateTask
        }
        Commands::Members => Action::RefreshTeamMembers,
        Commands::CreateMember {
            name,
            email,
            skills,
            role,
        } => {
            controller.edit_form(|form| {
                form.member_name = name;
                form.member_email = email;
                form.member_skills = skills;
                form.member_role = role.unwrap_or_default();
            });
            Action::CreateTeamMember
        }
        Commands::Assign { project, member } => {
            controller.edit_form(|form| {
                form.team_project = Some(project);
                form.selected_member = Some(member);
            });
            Action::AssignTeamMember
        }
        Commands::Ask { project, question } => {
            controller.edit_form(|form| {
                form.ai_project = Some(project);
                form.ai_question = question;
            });
            Action::AskAi
        }
        Commands::Prioritize { project, task } => {
            select_task(controller, project, task);
            Action::PrioritizeTask
        }
        Commands::Suggest { project, task } => {
            select_task(controller, project, task);
            Action::SuggestForTask
        }
        Commands::Report { project, pdf } => {
            controller.edit_form(|form| form.report_project = Some(project));
            match pdf {
                Some(path) => Action::ExportReportPdf(path),
                None => Action::GenerateReport,
            }
        }
    };
    controller.dispatch(action).await
}

fn select_task<S: DisplaySurface>(controller: &Controller<S>, project: i64, task: i64) {
    controller.edit_form(|form| {
        form.selected_project = Some(project);
        form.selected_task = Some(task);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_create_task() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "--api-url",
            "http://example.test/api/v1",
            "create-task",
            "--project",
            "1",
            "--title",
            "Fix bug",
            "--skills",
            "python",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://example.test/api/v1"));
        match cli.command {
            Some(Commands::CreateTask {
                project,
                title,
                description,
                skills,
            }) => {
                assert_eq!(project, 1);
                assert_eq!(title, "Fix bug");
                assert_eq!(description, "");
                assert_eq!(skills, "python");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_overview() {
        let cli = Cli::try_parse_from(["taskdesk", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_report_requires_project() {
        assert!(Cli::try_parse_from(["taskdesk", "report"]).is_err());
    }
}
