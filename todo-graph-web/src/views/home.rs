use crate::api;
use crate::components::TaskItem;
use dioxus::prelude::*;
use todo_graph::Task;

/// The single view of the app: a creation form above the task list.
/// Local signal state mirrors the server list; mutations patch it with
/// the server's response instead of refetching.
#[component]
pub fn Home() -> Element {
    let mut tasks = use_signal(Vec::<Task>::new);
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut loading = use_signal(|| false);

    // Load the full list once on mount.
    use_effect(move || {
        spawn(async move {
            match api::fetch_all_tasks().await {
                Ok(all_tasks) => tasks.set(all_tasks),
                Err(err) => tracing::error!("Failed to load tasks: {}", err),
            }
        });
    });

    let create = move |_| {
        let current_title = title().trim().to_string();
        if current_title.is_empty() {
            return;
        }
        spawn(async move {
            loading.set(true);
            let current_description = description().trim().to_string();
            let optional_description =
                (!current_description.is_empty()).then_some(current_description);
            match api::create_task(&current_title, optional_description.as_deref()).await {
                Ok(task) => {
                    tasks.write().insert(0, task);
                    title.set(String::new());
                    description.set(String::new());
                }
                // A failed create leaves the form populated.
                Err(err) => tracing::error!("Failed to create task: {}", err),
            }
            loading.set(false);
        });
    };

    let toggle = move |task: Task| {
        spawn(async move {
            match api::update_task_status(task.id, task.status.toggled()).await {
                Ok(Some(updated)) => {
                    let mut list = tasks.write();
                    if let Some(entry) = list.iter_mut().find(|entry| entry.id == updated.id) {
                        *entry = updated;
                    }
                }
                Ok(None) => tracing::warn!("Task {} no longer exists on the server", task.id),
                Err(err) => tracing::error!("Failed to update task: {}", err),
            }
        });
    };

    // View-local removal only: no delete mutation exists, so the task
    // reappears on the next full reload.
    let delete = move |id: i32| {
        tasks.write().retain(|task| task.id != id);
    };

    rsx! {
        main { class: "min-h-screen bg-gray-50 py-8",
            div { class: "max-w-2xl mx-auto px-6",
                h1 { class: "text-4xl font-bold text-gray-900 mb-8 text-center", "Tasks" }

                div { class: "bg-white rounded-lg shadow-md p-6 mb-8 space-y-3",
                    input {
                        class: "w-full border rounded-lg px-3 py-2",
                        placeholder: "Title",
                        value: "{title}",
                        oninput: move |event| title.set(event.value()),
                    }
                    textarea {
                        class: "w-full border rounded-lg px-3 py-2",
                        placeholder: "Description (optional)",
                        value: "{description}",
                        oninput: move |event| description.set(event.value()),
                    }
                    button {
                        class: "w-full bg-purple-600 text-white py-2 px-4 rounded-lg font-medium hover:bg-purple-700 transition-colors disabled:opacity-50",
                        disabled: loading(),
                        onclick: create,
                        if loading() {
                            "Adding..."
                        } else {
                            "Add Task"
                        }
                    }
                }

                if tasks().is_empty() {
                    div { class: "text-center py-12",
                        p { class: "text-gray-600", "No tasks yet. Add one above!" }
                    }
                } else {
                    ul { class: "space-y-3",
                        {tasks().iter().map(|task| rsx! {
                            TaskItem {
                                key: "{task.id}",
                                task: task.clone(),
                                on_toggle: toggle,
                                on_delete: delete,
                            }
                        })}
                    }
                }
            }
        }
    }
}
