//! Render functions: fetched data in, port calls out.
//!
//! Each function fully replaces the regions and selectors it owns, keeping
//! the server's ordering. Calling one twice with the same data yields the
//! same content.

use taskdesk_models::{PrioritizedTask, Project, ProjectReport, Task, TaskSuggestions, TeamMember};

use crate::state::Action;
use crate::surface::{Block, DisplaySurface, ItemAction, ListItem, Region, SelectOption, Selector};

fn options_for<'a, I>(selector: Selector, entries: I) -> Vec<SelectOption>
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    std::iter::once(SelectOption::placeholder(selector))
        .chain(entries.into_iter().map(|(id, label)| SelectOption {
            value: Some(id),
            label: label.to_string(),
        }))
        .collect()
}

pub fn render_projects<S: DisplaySurface + ?Sized>(surface: &mut S, projects: &[Project]) {
    let items = projects
        .iter()
        .map(|project| ListItem {
            key: project.id,
            text: format!(
                "{}: {}",
                project.name,
                project.description.as_deref().unwrap_or_default()
            ),
            detail: Some(format!("Team Members: {}", project.team_members_label())),
            actions: vec![
                ItemAction::new("View Details", Action::ShowProjectDetails(project.id)),
                ItemAction::new("View Tasks", Action::SelectProject(Some(project.id))),
            ],
        })
        .collect();
    surface.render_list(Region::ProjectList, "Projects", items);

    for selector in Selector::PROJECT_SELECTORS {
        let options = options_for(
            selector,
            projects.iter().map(|p| (p.id, p.name.as_str())),
        );
        surface.render_options(selector, options);
    }
}

pub fn render_tasks<S: DisplaySurface + ?Sized>(surface: &mut S, tasks: &[Task]) {
    let items = tasks
        .iter()
        .map(|task| ListItem {
            key: task.id,
            text: format!(
                "{}: {} (Skills: {})",
                task.title,
                task.status.as_deref().unwrap_or("New"),
                task.skills_label()
            ),
            detail: task
                .priority
                .as_ref()
                .map(|priority| format!("Priority: {}", priority)),
            actions: vec![ItemAction::new("Select", Action::SelectTask(Some(task.id)))],
        })
        .collect();
    surface.render_list(Region::TaskList, "Tasks", items);

    let options = options_for(
        Selector::Task,
        tasks.iter().map(|t| (t.id, t.title.as_str())),
    );
    surface.render_options(Selector::Task, options);
}

pub fn render_team_members<S: DisplaySurface + ?Sized>(surface: &mut S, members: &[TeamMember]) {
    let items = members
        .iter()
        .map(|member| ListItem {
            key: member.id,
            text: format!("{}: {}", member.name, member.skills_label()),
            detail: (!member.email.is_empty()).then(|| member.email.clone()),
            actions: vec![ItemAction::new(
                "Select",
                Action::SelectTeamMember(Some(member.id)),
            )],
        })
        .collect();
    surface.render_list(Region::TeamMemberList, "Team Members", items);

    let options = options_for(
        Selector::TeamMember,
        members.iter().map(|m| (m.id, m.name.as_str())),
    );
    surface.render_options(Selector::TeamMember, options);
}

pub fn render_project_details<S: DisplaySurface + ?Sized>(surface: &mut S, project: &Project) {
    let mut blocks = vec![Block::Heading(project.name.clone())];
    if let Some(description) = &project.description {
        blocks.push(Block::Paragraph(description.clone()));
    }
    if let Some(status) = &project.status {
        blocks.push(Block::Paragraph(format!("Status: {}", status)));
    }
    if let (Some(start), Some(end)) = (project.start_date, project.end_date) {
        blocks.push(Block::Paragraph(format!("Schedule: {} to {}", start, end)));
    }
    blocks.push(Block::Paragraph(format!(
        "Team Members: {}",
        project.team_members_label()
    )));
    if !project.tasks.is_empty() {
        blocks.push(Block::Heading("Tasks".to_string()));
        blocks.push(Block::Bullets(
            project
                .tasks
                .iter()
                .map(|task| {
                    format!(
                        "{} ({})",
                        task.title,
                        task.status.as_deref().unwrap_or("New")
                    )
                })
                .collect(),
        ));
    }
    surface.render_panel(Region::ProjectDetails, blocks);
}

pub fn render_ai_answer<S: DisplaySurface + ?Sized>(surface: &mut S, answer: &str) {
    surface.render_panel(Region::AiResponse, vec![Block::Paragraph(answer.to_string())]);
}

pub fn render_priority<S: DisplaySurface + ?Sized>(surface: &mut S, result: &PrioritizedTask) {
    let mut blocks = vec![Block::Paragraph(format!(
        "Task prioritized: {}",
        result.priority.as_deref().unwrap_or("unknown")
    ))];
    if let Some(reasoning) = &result.priority_reasoning {
        blocks.push(Block::Paragraph(reasoning.clone()));
    }
    surface.render_panel(Region::TaskActions, blocks);
}

pub fn render_suggestions<S: DisplaySurface + ?Sized>(surface: &mut S, result: &TaskSuggestions) {
    surface.render_panel(
        Region::TaskActions,
        vec![
            Block::Heading("Suggestions:".to_string()),
            Block::Bullets(result.suggestions.clone()),
            Block::Heading("Resources:".to_string()),
            Block::Bullets(result.resources.clone()),
        ],
    );
}

pub fn render_report<S: DisplaySurface + ?Sized>(surface: &mut S, report: &ProjectReport) {
    let mut blocks = vec![
        Block::Heading("Summary:".to_string()),
        Block::Paragraph(report.summary.clone()),
        Block::Heading("Key Metrics:".to_string()),
        Block::Bullets(report.metric_lines()),
    ];
    if !report.risks.is_empty() {
        blocks.push(Block::Heading("Risks:".to_string()));
        blocks.push(Block::Bullets(report.risks.clone()));
    }
    blocks.push(Block::Heading("Recommendations:".to_string()));
    blocks.push(Block::Bullets(report.recommendations.clone()));
    surface.render_panel(Region::ProjectReport, blocks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use serde_json::json;

    fn projects() -> Vec<Project> {
        serde_json::from_value(json!([
            {"id": 7, "name": "Zeppelin", "description": "Airship", "team_members": [
                {"id": 1, "name": "Ada", "email": "a@x"}
            ]},
            {"id": 2, "name": "Apollo", "description": null}
        ]))
        .unwrap()
    }

    #[test]
    fn test_project_selectors_match_fetch_order() {
        let mut surface = MemorySurface::new();
        render_projects(&mut surface, &projects());

        for selector in Selector::PROJECT_SELECTORS {
            let options = surface.options(selector).unwrap();
            let pairs: Vec<_> = options
                .iter()
                .map(|o| (o.value, o.label.as_str()))
                .collect();
            assert_eq!(
                pairs,
                vec![
                    (None, "Select a project"),
                    (Some(7), "Zeppelin"),
                    (Some(2), "Apollo"),
                ]
            );
        }

        assert_eq!(
            surface.list_texts(Region::ProjectList),
            vec!["Zeppelin: Airship", "Apollo: "]
        );
        let list = surface.list(Region::ProjectList).unwrap();
        assert_eq!(list.items[0].detail.as_deref(), Some("Team Members: Ada"));
        assert_eq!(list.items[1].detail.as_deref(), Some("Team Members: None"));
    }

    #[test]
    fn test_project_items_carry_their_actions() {
        let mut surface = MemorySurface::new();
        render_projects(&mut surface, &projects());

        let list = surface.list(Region::ProjectList).unwrap();
        let actions: Vec<_> = list.items[0].actions.iter().map(|a| &a.action).collect();
        assert_eq!(
            actions,
            vec![
                &Action::ShowProjectDetails(7),
                &Action::SelectProject(Some(7))
            ]
        );
    }

    #[test]
    fn test_empty_lists_keep_header_and_placeholder() {
        let mut surface = MemorySurface::new();
        render_projects(&mut surface, &[]);
        render_tasks(&mut surface, &[]);
        render_team_members(&mut surface, &[]);

        for (region, header) in [
            (Region::ProjectList, "Projects"),
            (Region::TaskList, "Tasks"),
            (Region::TeamMemberList, "Team Members"),
        ] {
            let list = surface.list(region).unwrap();
            assert_eq!(list.header, header);
            assert!(list.items.is_empty());
        }
        for selector in [Selector::Project, Selector::Task, Selector::TeamMember] {
            assert_eq!(
                surface.options(selector).unwrap(),
                [SelectOption::placeholder(selector)]
            );
        }
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let tasks: Vec<Task> = serde_json::from_value(json!([
            {"id": 1, "title": "Fix bug", "status": "New", "required_skills": ["python"], "priority": "High"},
            {"id": 2, "title": "Docs", "status": "Done", "required_skills": null}
        ]))
        .unwrap();

        let mut once = MemorySurface::new();
        render_tasks(&mut once, &tasks);
        let mut twice = MemorySurface::new();
        render_tasks(&mut twice, &tasks);
        render_tasks(&mut twice, &tasks);

        assert_eq!(once.list(Region::TaskList), twice.list(Region::TaskList));
        assert_eq!(once.options(Selector::Task), twice.options(Selector::Task));
        assert_eq!(
            once.list_texts(Region::TaskList),
            vec![
                "Fix bug: New (Skills: python)",
                "Docs: Done (Skills: None)"
            ]
        );
        assert_eq!(
            once.list(Region::TaskList).unwrap().items[0].detail.as_deref(),
            Some("Priority: High")
        );
    }

    #[test]
    fn test_team_member_rendering() {
        let members: Vec<TeamMember> = serde_json::from_value(json!([
            {"id": 3, "name": "Grace", "email": "g@x", "skills": ["cobol", "navy"]}
        ]))
        .unwrap();
        let mut surface = MemorySurface::new();
        render_team_members(&mut surface, &members);

        assert_eq!(
            surface.list_texts(Region::TeamMemberList),
            vec!["Grace: cobol, navy"]
        );
        let options = surface.options(Selector::TeamMember).unwrap();
        assert_eq!(options[0].label, "Select a team member");
        assert_eq!(options[1].value, Some(3));
    }

    #[test]
    fn test_report_panel_sections() {
        let report: ProjectReport = serde_json::from_value(json!({
            "summary": "On track",
            "key_metrics": {"completed": 4, "velocity": "steady"},
            "risks": ["Scope creep"],
            "recommendations": ["Hire"]
        }))
        .unwrap();
        let mut surface = MemorySurface::new();
        render_report(&mut surface, &report);

        assert_eq!(
            surface.panel(Region::ProjectReport).unwrap(),
            [
                Block::Heading("Summary:".to_string()),
                Block::Paragraph("On track".to_string()),
                Block::Heading("Key Metrics:".to_string()),
                Block::Bullets(vec!["completed: 4".to_string(), "velocity: steady".to_string()]),
                Block::Heading("Risks:".to_string()),
                Block::Bullets(vec!["Scope creep".to_string()]),
                Block::Heading("Recommendations:".to_string()),
                Block::Bullets(vec!["Hire".to_string()]),
            ]
        );
    }

    #[test]
    fn test_suggestions_and_priority_share_task_actions() {
        let mut surface = MemorySurface::new();
        render_priority(
            &mut surface,
            &PrioritizedTask {
                priority: Some("High".to_string()),
                priority_reasoning: None,
            },
        );
        assert_eq!(
            surface.panel(Region::TaskActions).unwrap(),
            [Block::Paragraph("Task prioritized: High".to_string())]
        );

        render_suggestions(
            &mut surface,
            &TaskSuggestions {
                suggestions: vec!["Pair up".to_string()],
                resources: vec![],
            },
        );
        let panel = surface.panel(Region::TaskActions).unwrap();
        assert_eq!(panel[0], Block::Heading("Suggestions:".to_string()));
        assert_eq!(panel[3], Block::Bullets(vec![]));
    }
}
