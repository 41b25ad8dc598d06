pub mod peer_graph;
