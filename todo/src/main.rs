//! Demo of the todo list context.
//!
//! Creates a task directly and another one through the task creation wizard,
//! then prints the resulting list and labels.

use std::sync::Arc;
use todo_list::task::TaskCommand;
use todo_list::types::{
    LabelColor, LabelDetails, TaskCreationId, TaskId, TaskPriority, ValueChange,
};
use todo_list::wizard::WizardCommand;
use todo_list::{TodoConfig, TodoContext};
use todo_list_core::environment::{RandomIds, SystemClock};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TodoConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();
    todo_list_runtime::metrics::describe_metrics();

    let context = TodoContext::new(config, Arc::new(SystemClock), Arc::new(RandomIds));

    println!("=== Todo List ===\n");

    let milk = TaskId::new();
    context
        .post(TaskCommand::CreateBasicTask {
            task_id: milk.clone(),
            description: "Buy milk".to_string(),
        })
        .await?;
    context
        .post(TaskCommand::CompleteTask {
            task_id: milk.clone(),
        })
        .await?;

    println!("Creating a task through the wizard...");
    let process = TaskCreationId::new();
    let trip = TaskId::new();
    let steps = [
        WizardCommand::StartTaskCreation {
            id: process.clone(),
            task_id: trip.clone(),
        },
        WizardCommand::UpdateTaskDetails {
            id: process.clone(),
            description_change: Some(ValueChange::new(String::new(), "Plan trip".to_string())),
            priority_change: Some(ValueChange::new(TaskPriority::Undefined, TaskPriority::High)),
            due_date_change: None,
        },
        WizardCommand::AddLabels {
            id: process.clone(),
            existing_labels: Vec::new(),
            new_labels: vec![LabelDetails::new("travel", LabelColor::Blue)],
        },
        WizardCommand::CompleteTaskCreation {
            id: process.clone(),
        },
    ];
    for step in steps {
        let receipt = context.post(step).await?;
        for rejection in &receipt.rejections {
            println!("  rejected: {rejection}");
        }
    }

    println!("\nMy list:");
    for item in context.my_list().items().await {
        let mark = if item.completed { "✓" } else { " " };
        println!("  [{mark}] {} ({:?})", item.description, item.priority);
    }

    println!("\nLabels:");
    for label in context.labelled_tasks().labels().await {
        let tasks: Vec<&str> = label
            .tasks
            .iter()
            .map(|task| task.description.as_str())
            .collect();
        println!(
            "  {} ({:?}): {}",
            label.details.title,
            label.details.color,
            tasks.join(", ")
        );
    }

    println!("\nDeleting 'Buy milk' is rejected while it is completed:");
    if let Err(error) = context.post(TaskCommand::DeleteTask { task_id: milk }).await {
        println!("  {error}");
    }

    Ok(())
}
