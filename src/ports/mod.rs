pub mod delay;
pub mod playlist_source;
pub mod tag_writer;
pub mod track_fetcher;
