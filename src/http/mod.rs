mod health;

pub(crate) use health::readiness_check;
