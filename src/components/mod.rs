pub mod schema_graph;
