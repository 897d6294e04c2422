pub mod club;

use crate::actix_web::web::{put, resource, scope, ServiceConfig};
use crate::core::ports::repository::Manager;
use crate::middlewares::jwt::Jwt;

pub fn routes<M>(secret: Vec<u8>) -> impl FnOnce(&mut ServiceConfig)
where
    M: Manager + 'static,
{
    move |cfg: &mut ServiceConfig| {
        cfg.service(
            scope("clubs")
                .wrap(Jwt::new(secret))
                .service(resource("{id}/requests/{username}").route(put().to(club::process_join_request::<M>))),
        );
    }
}
