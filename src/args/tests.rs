use super::*;
use clap::Parser;
use std::time::Duration;
