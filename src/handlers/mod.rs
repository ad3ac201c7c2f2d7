// Two tiers: public (no session) and protected (behind the session gate)
pub mod protected;
pub mod public;
