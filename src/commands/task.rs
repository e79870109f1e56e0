use chrono::NaiveDate;
use clap::{Args, Subcommand};
use uuid::Uuid;

use hivekeep::models::Task;
use hivekeep::repository::LocalRepository;

use super::OutputFormat;

#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task
    Add {
        /// What needs doing
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        #[arg(long)]
        description: Option<String>,

        /// Category, e.g. "feeding" or "harvest"
        #[arg(long)]
        category: Option<String>,

        /// Show a reminder notification
        #[arg(long)]
        remind: bool,
    },

    /// List tasks
    List {
        /// Only tasks due today
        #[arg(long)]
        today: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Mark a task as done
    Done {
        /// Task ID (UUID)
        id: Uuid,
    },

    /// Delete a task
    Delete {
        /// Task ID (UUID)
        id: Uuid,
    },
}

impl TaskCommand {
    /// Returns whether local data changed.
    pub async fn run(&self, repo: &LocalRepository) -> Result<bool, Box<dyn std::error::Error>> {
        match &self.command {
            TaskSubcommand::Add {
                title,
                date,
                description,
                category,
                remind,
            } => {
                let mut task = Task::new(title.clone(), *date).with_reminder(*remind);
                if let Some(description) = description {
                    task = task.with_description(description.clone());
                }
                if let Some(category) = category {
                    task = task.with_category(category.clone());
                }

                repo.create_task(&task).await?;
                println!("Added task: {} ({})", task.title, task.id);
                Ok(true)
            }

            TaskSubcommand::List { today, format } => {
                let tasks = if *today {
                    repo.get_today_tasks().await?
                } else {
                    repo.get_all_tasks().await?
                };

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&tasks)?);
                    }
                    OutputFormat::Text => {
                        if tasks.is_empty() {
                            println!("No tasks found.");
                        }
                        for task in &tasks {
                            println!("{}  {}", task, task.id);
                        }
                    }
                }
                Ok(false)
            }

            TaskSubcommand::Done { id } => {
                let task = repo.get_task(*id).await?.completed();
                repo.save_task(&task).await?;
                println!("Completed: {}", task.title);
                Ok(true)
            }

            TaskSubcommand::Delete { id } => {
                let task = repo.get_task(*id).await?;
                repo.delete_task(task.id).await?;
                println!("Deleted task: {}", task.title);
                Ok(true)
            }
        }
    }
}
