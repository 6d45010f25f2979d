mod ai_summary;
mod get_latest_movies;
mod get_movie_info;
mod get_movie_list;
mod search_movies;
mod util;

pub use ai_summary::*;
pub use get_latest_movies::*;
pub use get_movie_info::*;
pub use get_movie_list::*;
pub use search_movies::*;
pub use util::*;
