//! Document fixtures.
//!
//! Line numbers quoted in the tests refer to these texts exactly; keep the
//! line layout stable when editing them.

/// Schema for `movies`. `id` is on line 10, its `type` on line 12.
pub const MOVIES_SCHEMA: &str = "\
movies:
  subject_area: catalog
  table_info:
    - table: movies
      joins:
        - movies.id = ratings.movie_id
    - table: ratings
      joins: []
  columns:
    id:
      name: Movie id
      type: INT
      column: id
      desc: Primary key
      primary_key: true
    title:
      name: Title
      type: VARCHAR
      column: title
      desc: Movie title
      table: movies
    rating:
      name: Rating
      type: DECIMAL(3,1)
      column: rating
      desc: Average rating
      table: ratings
";

pub const MOVIES_DDL: &str = "\
-- catalog tables
CREATE TABLE catalog.movies (
  id INTEGER NOT NULL,
  title VARCHAR(200),
  rating NUMERIC(3, 1),
  CONSTRAINT pk_movies PRIMARY KEY (id)
);
";

/// Semantic document over `movies`, importing every column.
pub const MOVIE_METRICS: &str = "\
movie_metrics:
  folder: catalog
  type: semantic
  source:
    schema.movies:
      columns: <all>
  attributes:
    film_title:
      name: Film title
      synonym: [name]
      description: Title of the film
      include: [title]
  metrics:
    average_rating:
      name: Average rating
      calculation: AVG([rating])
    rating_spread:
      name: Rating spread
      calculation: \"[average_rating] - [lowest_rating]\"
    lowest_rating:
      name: Lowest rating
      calculation: MIN([rating])
";
