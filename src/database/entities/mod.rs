pub mod common_types;

pub mod departments;
pub mod process_statuses;
pub mod projects;
pub mod todo_attachments;
pub mod todo_categories;
pub mod todo_comments;
pub mod todo_items;
pub mod todo_sub_tasks;
pub mod users;
pub mod work_log_departments;
pub mod work_log_entries;
pub mod work_log_work_types;
pub mod work_types;
