//! Scene-level integration tests exercising the graph, drawables and
//! recording backend together
