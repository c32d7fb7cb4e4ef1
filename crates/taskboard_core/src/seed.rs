use crate::model::{Priority, Task, TaskStatus};

/// Example board shown the first time the store is opened with nothing saved.
pub fn example_tasks() -> Vec<Task> {
    [
        (
            "1",
            "Design User Interface",
            "Create wireframes and mockups for the new dashboard layout using Figma",
            TaskStatus::Todo,
            Priority::High,
            "2024-01-15T00:00:00Z",
        ),
        (
            "2",
            "Implement Authentication",
            "Set up JWT authentication with refresh tokens and secure password hashing",
            TaskStatus::InProgress,
            Priority::High,
            "2024-01-16T00:00:00Z",
        ),
        (
            "3",
            "API Documentation",
            "Write comprehensive API documentation using Swagger/OpenAPI specification",
            TaskStatus::Todo,
            Priority::Medium,
            "2024-01-17T00:00:00Z",
        ),
        (
            "4",
            "Database Optimization",
            "Optimize database queries and add appropriate indexes for better performance",
            TaskStatus::Done,
            Priority::Medium,
            "2024-01-14T00:00:00Z",
        ),
        (
            "5",
            "Unit Testing",
            "Write unit tests for core business logic components using Jest",
            TaskStatus::InProgress,
            Priority::Medium,
            "2024-01-18T00:00:00Z",
        ),
        (
            "6",
            "Mobile Responsiveness",
            "Ensure all pages are fully responsive on mobile devices",
            TaskStatus::Todo,
            Priority::High,
            "2024-01-19T00:00:00Z",
        ),
    ]
    .into_iter()
    .map(|(id, title, description, status, priority, created_at)| Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        priority,
        created_at: created_at.to_string(),
    })
    .collect()
}
