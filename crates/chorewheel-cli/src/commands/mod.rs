pub mod child;
pub mod done;
pub mod generate;
pub mod household;
pub mod list;
pub mod overdue;
pub mod points;
pub mod reassign;
pub mod template;
