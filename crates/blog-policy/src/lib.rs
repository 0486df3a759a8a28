//! Authorization policy for posts.
//!
//! Everything here is a pure function of the actor and the post; callers
//! load the post first and decide what "not found" means.
//!
//! | role     | create | read | update / delete      | comment / like |
//! |----------|--------|------|----------------------|----------------|
//! | `admin`  | yes    | yes  | any post             | yes            |
//! | `author` | yes    | yes  | posts they own       | yes            |
//! | `reader` | no     | yes  | no                   | yes            |

pub mod policy;

pub use policy::{authorize, can_create, can_mutate, Decision, PostAction};
