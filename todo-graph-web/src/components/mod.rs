mod task_item;

pub use task_item::TaskItem;
