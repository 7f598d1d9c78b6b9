mod layout;
mod widgets;

pub use layout::render;
pub use widgets::{
    render_editor,
    render_header,
    render_input_overlay,
    render_note_list,
    render_note_summary,
    render_preview,
    render_search_overlay,
    render_status_bar,
    render_template_picker,
    render_versions_overlay,
};
