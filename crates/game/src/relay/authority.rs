use glam::Vec3;

use super::action::Action;
use super::context::{NetContext, NetRole};
use crate::actor::{ActionError, ActorId};
use crate::net::{Message, Outgoing, Recipient};
use crate::session::World;

/// Executes an action issued locally (input or AI) and returns whatever must
/// go out on the wire. The local apply always happens first; that is the
/// prediction that keeps the acting peer responsive.
pub fn submit(
    world: &mut World,
    ctx: &NetContext,
    actor: ActorId,
    mut action: Action,
) -> Vec<Outgoing> {
    ensure_world_name(world, &mut action);

    if let Err(err) = apply_local(world, actor, &action) {
        log::debug!(
            "local {} on actor {} rejected: {}",
            action.kind_name(),
            actor,
            err
        );
        return Vec::new();
    }

    match ctx.role {
        NetRole::Offline => Vec::new(),
        NetRole::Server => vec![Outgoing::new(
            Recipient::AllExcept(ctx.local_peer),
            Message::ActionBroadcast {
                actor,
                action,
                originator: ctx.local_peer,
            },
        )],
        NetRole::Client => vec![Outgoing::new(
            Recipient::Server,
            Message::ActionRequest {
                actor,
                action,
                originator: ctx.local_peer,
            },
        )],
    }
}

/// Applies one received message. Requests are only meaningful on the server;
/// broadcasts are applied exactly once per peer, filtered by originator
/// identity, and never re-forwarded.
pub fn handle_message(world: &mut World, ctx: &NetContext, message: Message) -> Vec<Outgoing> {
    match message {
        Message::ActionRequest {
            actor,
            mut action,
            originator,
        } => {
            if !ctx.is_server() {
                log::warn!("action request from peer {} on non-server peer", originator);
                return Vec::new();
            }
            ensure_world_name(world, &mut action);

            // Re-validation against authoritative state. A reference another
            // peer already consumed drops silently; the requester's
            // prediction snaps back on the next full-state resync.
            if let Err(err) = revalidate(world, actor, &action) {
                log::debug!(
                    "dropping {} from peer {}: {}",
                    action.kind_name(),
                    originator,
                    err
                );
                return Vec::new();
            }

            vec![Outgoing::new(
                Recipient::AllExcept(originator),
                Message::ActionBroadcast {
                    actor,
                    action,
                    originator,
                },
            )]
        }
        Message::ActionBroadcast {
            actor,
            action,
            originator,
        } => {
            // Our own predicted action coming back around; already applied.
            if originator == ctx.local_peer {
                return Vec::new();
            }
            if let Err(err) = apply_local(world, actor, &action) {
                log::debug!(
                    "forwarded {} on actor {} not applicable: {}",
                    action.kind_name(),
                    actor,
                    err
                );
            }
            Vec::new()
        }
        Message::Position { actor, x, y, z } => {
            if let Some(actor) = world.actor_mut(actor) {
                actor.set_position(Vec3::new(x, y, z));
            }
            Vec::new()
        }
        Message::Rotation {
            actor,
            body_yaw,
            head_pitch,
        } => {
            if let Some(actor) = world.actor_mut(actor) {
                actor.set_rotation(body_yaw, head_pitch);
            }
            Vec::new()
        }
    }
}

/// Applies a forwarded request against authoritative state. Any failure
/// means the request's references went stale between the client's prediction
/// and its arrival here.
fn revalidate(world: &mut World, actor: ActorId, action: &Action) -> Result<(), ActionError> {
    apply_local(world, actor, action).map_err(|_| ActionError::StaleReference)
}

/// Executes the effect against local state, regardless of network role.
pub fn apply_local(world: &mut World, actor: ActorId, action: &Action) -> Result<(), ActionError> {
    match action {
        Action::Equip { index, world_name } => {
            world.equip(actor, *index as usize, world_name.clone())
        }
        Action::Stash => world.stash(actor),
        Action::Use { kind, released } => world.use_item(actor, *kind, *released),
        Action::Discard { index, world_name } => {
            let name = world_name.clone().ok_or(ActionError::NotFound)?;
            world.discard(actor, index.map(|i| i as usize), name)
        }
    }
}

/// Fills in the freed-world-item display name for actions that may need one.
/// The originating authority mints it; everyone downstream applies the action
/// verbatim, so the name can never be generated twice.
fn ensure_world_name(world: &mut World, action: &mut Action) {
    match action {
        Action::Equip { world_name, .. } | Action::Discard { world_name, .. }
            if world_name.is_none() =>
        {
            *world_name = Some(world.names.next_item_name());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemKind, ItemRecord};
    use crate::net::SERVER_PEER;
    use crate::session::SessionEvent;

    fn world_for(peer: u16) -> (World, ActorId) {
        let mut world = World::new(peer);
        let id = world.spawn_actor("holden", 2, Vec3::new(0.0, 1.0, 0.0));
        world
            .actor_mut(id)
            .unwrap()
            .inventory_mut()
            .store(ItemRecord::new(1, ItemKind::MeleeWeapon, "sword"));
        (world, id)
    }

    #[test]
    fn offline_submit_is_the_whole_protocol() {
        let (mut world, id) = world_for(1);
        let out = submit(&mut world, &NetContext::offline(), id, Action::equip(0));

        assert!(out.is_empty());
        assert!(world.actor(id).unwrap().is_armed());
    }

    #[test]
    fn client_submit_applies_then_requests() {
        let (mut world, id) = world_for(2);
        let ctx = NetContext::client(2);
        let out = submit(&mut world, &ctx, id, Action::equip(0));

        assert!(world.actor(id).unwrap().is_armed());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, Recipient::Server);
        match &out[0].message {
            Message::ActionRequest { originator, .. } => assert_eq!(*originator, 2),
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn server_submit_broadcasts_to_everyone_else() {
        let (mut world, id) = world_for(1);
        let out = submit(&mut world, &NetContext::server(), id, Action::equip(0));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, Recipient::AllExcept(SERVER_PEER));
        assert!(matches!(
            out[0].message,
            Message::ActionBroadcast { originator: SERVER_PEER, .. }
        ));
    }

    #[test]
    fn failed_local_apply_sends_nothing() {
        let (mut world, id) = world_for(2);
        let out = submit(&mut world, &NetContext::client(2), id, Action::equip(9));
        assert!(out.is_empty());
        assert!(!world.actor(id).unwrap().is_armed());
    }

    #[test]
    fn server_drops_stale_request_silently() {
        let (mut world, id) = world_for(1);
        // Another peer already consumed the item.
        world.equip(id, 0, None).unwrap();

        let out = handle_message(
            &mut world,
            &NetContext::server(),
            Message::ActionRequest {
                actor: id,
                action: Action::equip(0),
                originator: 2,
            },
        );
        assert!(out.is_empty());
    }

    #[test]
    fn revalidation_failures_surface_as_stale_references() {
        let (mut world, id) = world_for(1);
        world.equip(id, 0, None).unwrap();

        assert_eq!(
            revalidate(&mut world, id, &Action::equip(0)),
            Err(ActionError::StaleReference)
        );
        assert_eq!(
            revalidate(&mut world, 99, &Action::Stash),
            Err(ActionError::StaleReference)
        );
    }

    #[test]
    fn server_rebroadcast_excludes_originator() {
        let (mut world, id) = world_for(1);
        let out = handle_message(
            &mut world,
            &NetContext::server(),
            Message::ActionRequest {
                actor: id,
                action: Action::equip(0),
                originator: 2,
            },
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to, Recipient::AllExcept(2));
        assert!(world.actor(id).unwrap().is_armed());
    }

    #[test]
    fn own_broadcast_is_filtered_by_identity() {
        let (mut world, id) = world_for(2);
        let ctx = NetContext::client(2);
        submit(&mut world, &ctx, id, Action::equip(0));
        let count_after_predict = world.actor(id).unwrap().inventory().count();

        // The same action echoed back twice must not re-apply.
        for _ in 0..2 {
            let out = handle_message(
                &mut world,
                &ctx,
                Message::ActionBroadcast {
                    actor: id,
                    action: Action::equip(0),
                    originator: 2,
                },
            );
            assert!(out.is_empty());
        }
        assert_eq!(
            world.actor(id).unwrap().inventory().count(),
            count_after_predict
        );
        assert!(world.actor(id).unwrap().is_armed());
    }

    #[test]
    fn broadcasts_are_never_reforwarded() {
        let (mut world, id) = world_for(3);
        let out = handle_message(
            &mut world,
            &NetContext::client(3),
            Message::ActionBroadcast {
                actor: id,
                action: Action::equip(0),
                originator: 2,
            },
        );

        assert!(out.is_empty());
        assert!(world.actor(id).unwrap().is_armed());
    }

    #[test]
    fn discard_mints_a_name_when_submitting() {
        let (mut world, id) = world_for(1);
        let out = submit(
            &mut world,
            &NetContext::server(),
            id,
            Action::discard(Some(0)),
        );

        match &out[0].message {
            Message::ActionBroadcast {
                action: Action::Discard { world_name, .. },
                ..
            } => assert_eq!(world_name.as_deref(), Some("item_1_0")),
            other => panic!("unexpected message {:?}", other),
        }
        assert_eq!(world.items.len(), 1);
        let events: Vec<_> = world.events.drain().collect();
        assert!(matches!(events[0], SessionEvent::ItemDiscarded { .. }));
    }

    #[test]
    fn rotation_message_clamps_pitch() {
        let (mut world, id) = world_for(3);
        handle_message(
            &mut world,
            &NetContext::client(3),
            Message::Rotation {
                actor: id,
                body_yaw: 45.0,
                head_pitch: 170.0,
            },
        );
        assert_eq!(world.actor(id).unwrap().head_pitch(), 90.0);
    }
}
