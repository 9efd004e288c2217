mod handler;
pub mod model;

pub use handler::{
    add_teacher_subject, delete_teacher, get_teacher, list_teacher_subjects, list_teachers,
    remove_teacher_subject, update_teacher,
};
