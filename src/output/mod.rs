//! Terminal output module
//!
//! Status lines, progress bars and the end-of-run summary.

pub mod terminal;

pub use terminal::{
    create_progress_bar, create_spinner, print_error, print_export_summary, print_header,
    print_info, print_success, print_user_report, print_warning,
};
