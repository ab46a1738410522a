pub mod delay;
pub mod tag_writer;
pub mod ytdlp;
