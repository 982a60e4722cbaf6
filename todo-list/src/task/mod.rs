use crate::entities::*;
use sea_orm::prelude::DateTime;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Task {
    id: u32,
    description: String,
    completed: bool,
    created_at: DateTime,
}

impl Task {
    pub fn new(id: u32, description: String, completed: bool, created_at: DateTime) -> Self {
        Self {
            id,
            description,
            completed,
            created_at,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the description of the task.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the task has been completed.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the time the store recorded the task at.
    pub fn created_at(&self) -> DateTime {
        self.created_at
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(
            model.id as u32,
            model.description,
            model.completed,
            model.created_at,
        )
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// The description was empty or only whitespace.
    #[error("Task description cannot be empty")]
    EmptyDescription,
    /// No task row has the given ID.
    #[error("Task with ID {0} not found")]
    TaskNotFound(u32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Router state shared by the task handlers.
#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Creates a new task in the database.
    ///
    /// # Arguments
    ///
    /// * `description` - The task text. Surrounding whitespace is trimmed before storing.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task`, with the ID and creation time assigned by
    /// the store, or `TaskServiceError::EmptyDescription` if nothing is left after trimming.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, description: &str) -> Result<Task, TaskServiceError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskServiceError::EmptyDescription);
        }

        let active_model = task::ActiveModel {
            description: ActiveValue::Set(description.to_string()),
            completed: ActiveValue::Set(false),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!("Created task with ID {}", created_model.id);
        Ok(Task::from(created_model))
    }

    /// Retrieves all tasks, most recently created first.
    ///
    /// Tasks sharing a creation timestamp are ordered by descending ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: u32) -> Result<Task, TaskServiceError> {
        let task_model = task::Entity::find_by_id(id as i32)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        Ok(Task::from(task_model))
    }

    /// Flips the completion flag of a task.
    ///
    /// The flip is a single `UPDATE ... SET completed = NOT completed` statement, and the
    /// updated row is read back in the same transaction, so concurrent toggles of one task
    /// cannot overwrite each other.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task`, or `TaskServiceError::TaskNotFound` if no
    /// row matched.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_task_by_id(&self, id: u32) -> Result<Task, TaskServiceError> {
        let txn = self.db.begin().await?;

        let result = task::Entity::update_many()
            .col_expr(
                task::Column::Completed,
                Expr::col(task::Column::Completed).not(),
            )
            .filter(task::Column::Id.eq(id as i32))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(TaskServiceError::TaskNotFound(id));
        }

        let updated_model = task::Entity::find_by_id(id as i32)
            .one(&txn)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        txn.commit().await?;

        Ok(Task::from(updated_model))
    }

    /// Permanently deletes a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: u32) -> Result<(), TaskServiceError> {
        let result = task::Entity::delete_by_id(id as i32).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound(id));
        }
        tracing::info!("Deleted task with ID {}", id);
        Ok(())
    }
}
