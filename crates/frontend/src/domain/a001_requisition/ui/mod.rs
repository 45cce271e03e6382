pub mod detail;
pub mod form;
pub mod my_list;
pub mod review;
