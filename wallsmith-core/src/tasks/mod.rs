pub mod task_details;
