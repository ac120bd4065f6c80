pub mod assembler;
pub mod comments;
pub mod docx;
pub mod report;

pub use assembler::{DocumentAssembler, ExportProgress, SourceFile};
pub use comments::{strip_comments, CommentStyle};
pub use docx::{Block, CodeFont, DocxDocument};
pub use report::{ExportReport, SettingsSnapshot};
