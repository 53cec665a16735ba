pub mod handoff;
