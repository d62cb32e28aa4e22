use dioxus::prelude::*;
use todo_graph::{Task, TaskStatus};

/// A single row in the task list: status checkbox, title, optional
/// description, timestamps, and the view-local delete button.
#[component]
pub fn TaskItem(task: Task, on_toggle: EventHandler<Task>, on_delete: EventHandler<i32>) -> Element {
    let completed = task.status == TaskStatus::Completed;
    let title_class = if completed {
        "line-through text-gray-400"
    } else {
        "text-gray-900"
    };
    let badge_class = if completed {
        "bg-green-100 text-green-800"
    } else {
        "bg-yellow-100 text-yellow-800"
    };

    let task_id = task.id;
    let description = task.description.clone();
    let created = task.created_at.format("%Y-%m-%d %H:%M").to_string();
    let updated = task
        .updated_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string());
    let task_for_toggle = task.clone();

    rsx! {
        li { class: "bg-white rounded-lg shadow-md p-4 flex items-start gap-3",
            input {
                r#type: "checkbox",
                class: "mt-1 h-5 w-5",
                checked: completed,
                onchange: move |_| on_toggle.call(task_for_toggle.clone()),
            }
            div { class: "flex-1",
                div { class: "flex items-center gap-2",
                    p { class: "font-semibold {title_class}", "{task.title}" }
                    span { class: "px-2 py-1 rounded-full text-xs font-medium {badge_class}",
                        "{task.status}"
                    }
                }
                if let Some(description) = description {
                    p { class: "text-sm text-gray-600", "{description}" }
                }
                p { class: "text-xs text-gray-400",
                    "Created {created}"
                    if let Some(updated) = updated {
                        " · Updated {updated}"
                    }
                }
            }
            button {
                class: "text-red-500 hover:text-red-700 text-sm font-medium",
                onclick: move |_| on_delete.call(task_id),
                "Delete"
            }
        }
    }
}
