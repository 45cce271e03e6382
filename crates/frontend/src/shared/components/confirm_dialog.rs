use leptos::prelude::*;
use thaw::*;

/// Yes/no dialog for actions that change stored data.
///
/// Closing the dialog any way other than "Confirmar" (button, mask click,
/// Escape) runs `on_cancel`.
#[component]
pub fn ConfirmDialog(
    open: RwSignal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(into)] message: Signal<String>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let confirmed = StoredValue::new(false);

    Effect::new(move |was_open: Option<bool>| {
        let is_open = open.get();
        if was_open == Some(true) && !is_open {
            if confirmed.get_value() {
                confirmed.set_value(false);
            } else {
                on_cancel.run(());
            }
        }
        is_open
    });

    view! {
        <Dialog open=open>
            <DialogSurface>
                <DialogBody>
                    <DialogTitle>{move || title.get()}</DialogTitle>
                    <DialogContent>
                        <p>{move || message.get()}</p>
                    </DialogContent>
                    <DialogActions>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| {
                                confirmed.set_value(true);
                                open.set(false);
                                on_confirm.run(());
                            }
                        >
                            "Confirmar"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| open.set(false)
                        >
                            "Cancelar"
                        </Button>
                    </DialogActions>
                </DialogBody>
            </DialogSurface>
        </Dialog>
    }
}
